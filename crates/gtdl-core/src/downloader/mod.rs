//! Per-lesson download pipeline.
//!
//! Resolves the video and notation URLs from the lesson detail page and
//! streams them into the sanitized directory tree. Idempotent per target
//! file: existing files are skipped before any network traffic, so an
//! aborted run resumes at the point of failure when re-run.

mod extract;

use anyhow::{bail, Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::course::Lesson;
use crate::sanitize::sanitize;
use crate::session::Session;
use crate::storage::PartFile;

static LESSON_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button.lessonButton").unwrap());
static CONTENT_SECTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section#content").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

const VIDEO_BUTTON_LABEL: &str = "DOWNLOAD LESSON";
const NOTATION_BUTTON_LABEL: &str = "PRINT NOTATION";

/// Downloads one lesson's video, and its notation when the video was
/// actually fetched, into `basedir`. Files already present are left
/// untouched without touching the network.
pub fn download_lesson(session: &mut Session, lesson: &Lesson, basedir: &Path) -> Result<()> {
    let dir = lesson_dir(lesson, basedir)?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let stem = sanitize(&format!("{:02} - {}", lesson.lesson_number, lesson.lesson))?;

    let video_path = dir.join(format!("{stem}.mp4"));
    let fetched_video = if video_path.exists() {
        tracing::info!("skipping existing {}", video_path.display());
        false
    } else {
        tracing::info!("downloading video {}", video_path.display());
        download_video(session, lesson, &video_path)?;
        true
    };

    // Notation is only looked up on the pass that fetched the video; once a
    // run has gone through a lesson completely, re-runs stay off the network.
    let notation_path = dir.join(format!("{stem}.pdf"));
    if fetched_video && !notation_path.exists() {
        tracing::info!("downloading notation {}", notation_path.display());
        download_notation(session, lesson, &notation_path)?;
    } else if notation_path.exists() {
        tracing::info!("skipping existing {}", notation_path.display());
    }
    Ok(())
}

/// `<basedir>/<chapter>/<NN - tutorial>`, all components sanitized.
fn lesson_dir(lesson: &Lesson, basedir: &Path) -> Result<PathBuf> {
    let chapter = lesson
        .chapter
        .as_deref()
        .with_context(|| format!("lesson '{}' has no chapter", lesson.lesson))?;
    let tutorial = lesson
        .tutorial
        .as_deref()
        .with_context(|| format!("lesson '{}' has no tutorial", lesson.lesson))?;
    Ok(basedir
        .join(sanitize(chapter)?)
        .join(sanitize(&format!("{:02} - {}", lesson.tutorial_number, tutorial))?))
}

fn download_video(session: &mut Session, lesson: &Lesson, video_path: &Path) -> Result<()> {
    let lesson_page = session.get_text(&lesson.lesson_url)?;
    let document = Html::parse_document(&lesson_page);

    let button = document
        .select(&LESSON_BUTTON)
        .find(|b| button_label(*b) == VIDEO_BUTTON_LABEL)
        .with_context(|| format!("no download button on lesson page for '{}'", lesson.lesson))?;
    let onclick = button
        .value()
        .attr("onclick")
        .context("download button has no onclick handler")?;
    let download_page_url = extract::video_page_url(onclick)
        .with_context(|| format!("no URL in download button handler: {onclick}"))?
        .to_string();

    let download_page = session.get_text(&download_page_url)?;
    let document = Html::parse_document(&download_page);
    let content = match document.select(&CONTENT_SECTION).next() {
        Some(content) => content,
        None => bail!(
            "cannot download video for '{}': {}",
            lesson.lesson,
            page_text(&document)
        ),
    };

    let mut links = content.select(&ANCHOR);
    let link = match (links.next(), links.next()) {
        (Some(link), None) => link,
        (None, _) => bail!(
            "cannot download video for '{}': {}",
            lesson.lesson,
            page_text(&document)
        ),
        (Some(_), Some(_)) => bail!("multiple video links for '{}'", lesson.lesson),
    };
    let video_url = link
        .value()
        .attr("href")
        .context("video link has no href")?;

    let mut part = PartFile::create(video_path)?;
    session.download_to(video_url, &mut part)?;
    part.finalize()
}

fn download_notation(session: &mut Session, lesson: &Lesson, notation_path: &Path) -> Result<()> {
    let lesson_page = session.get_text(&lesson.lesson_url)?;
    let document = Html::parse_document(&lesson_page);

    let buttons: Vec<ElementRef> = document
        .select(&LESSON_BUTTON)
        .filter(|b| button_label(*b) == NOTATION_BUTTON_LABEL)
        .collect();
    let button = match buttons.as_slice() {
        [] => {
            // The one recoverable case: plenty of lessons simply have no
            // notation to print.
            tracing::info!("no notation for '{}'", lesson.lesson);
            return Ok(());
        }
        [button] => *button,
        _ => bail!("multiple notation buttons for '{}'", lesson.lesson),
    };
    let onclick = button
        .value()
        .attr("onclick")
        .context("notation button has no onclick handler")?;
    let pdf_url = extract::notation_url(onclick)
        .with_context(|| format!("no URL in notation button handler: {onclick}"))?;

    let mut part = PartFile::create(notation_path)?;
    session.download_to(pdf_url, &mut part)?;
    part.finalize()
}

fn button_label(button: ElementRef) -> String {
    button.text().collect::<String>().trim().to_string()
}

/// Visible text of a page, used as the diagnostic when a download page
/// carries no content section or no link (typically an error message).
fn page_text(document: &Html) -> String {
    document
        .root_element()
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson() -> Lesson {
        Lesson {
            chapter: Some("Chapter 1: Basics".to_string()),
            tutorial: Some("Open & Barre Chords".to_string()),
            tutorial_number: 2,
            lesson: "E Major".to_string(),
            lesson_url: "/lesson/1".to_string(),
            lesson_number: 3,
        }
    }

    #[test]
    fn lesson_dir_sanitizes_every_component() {
        let dir = lesson_dir(&lesson(), Path::new("/media/lessons")).unwrap();
        assert_eq!(
            dir,
            PathBuf::from("/media/lessons/Chapter 1 - Basics/02 - Open and Barre Chords")
        );
    }

    #[test]
    fn lesson_without_chapter_is_an_error() {
        let mut orphan = lesson();
        orphan.chapter = None;
        let err = lesson_dir(&orphan, Path::new("/media")).unwrap_err();
        assert!(format!("{err:#}").contains("no chapter"));
    }

    #[test]
    fn lesson_without_tutorial_is_an_error() {
        let mut orphan = lesson();
        orphan.tutorial = None;
        let err = lesson_dir(&orphan, Path::new("/media")).unwrap_err();
        assert!(format!("{err:#}").contains("no tutorial"));
    }

    #[test]
    fn unsafe_chapter_name_aborts_with_sanitize_error() {
        let mut bad = lesson();
        bad.chapter = Some("Song\u{2122}".to_string());
        let err = lesson_dir(&bad, Path::new("/media")).unwrap_err();
        assert!(format!("{err:#}").contains("not sanitized properly"));
    }
}
