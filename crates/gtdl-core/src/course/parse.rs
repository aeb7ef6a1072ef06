//! Pure HTML traversal of the course hierarchy.
//!
//! The course page nests chapter titles and tutorial lists under one
//! chapter-list container; tutorial lists nest tutorial titles and lesson
//! lists. Traversal is strict: an element that is not one of the expected
//! markers for its level aborts the whole parse, so changed markup fails
//! loudly instead of silently dropping or mis-attributing lessons.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use thiserror::Error;

use super::Lesson;

static CHAPTER_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.course__chapterList").unwrap());
static CHAPTER_TITLE_INNER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.course__chapterTitle__inner").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no chapter list found on course page")]
    ChapterListMissing,
    #[error("unexpected <{element}> in {level} list")]
    UnexpectedElement { element: String, level: &'static str },
    #[error("chapter title block has no inner title attribute")]
    ChapterTitleMissing,
    #[error("lesson entry has no title attribute")]
    LessonTitleMissing,
    #[error("lesson '{lesson}' has no link")]
    LessonLinkMissing { lesson: String },
}

/// Parses a course page into its lessons, in document order: chapter order,
/// tutorial order within chapter, lesson order within tutorial.
pub fn lessons_from_course(html: &str) -> Result<Vec<Lesson>, ParseError> {
    let document = Html::parse_document(html);
    let chapter_list = document
        .select(&CHAPTER_LIST)
        .next()
        .ok_or(ParseError::ChapterListMissing)?;

    let mut lessons = Vec::new();
    lessons_from_chapter_list(chapter_list, &mut lessons)?;
    Ok(lessons)
}

/// Chapter level: a chapter-title child updates the current chapter; each
/// tutorial-list child is traversed with it.
fn lessons_from_chapter_list(list: ElementRef, out: &mut Vec<Lesson>) -> Result<(), ParseError> {
    let mut chapter: Option<String> = None;
    for node in list.children() {
        let item = match ElementRef::wrap(node) {
            Some(item) => item,
            // Text and comment nodes between markers are layout noise.
            None => continue,
        };
        if has_class(item, "course__chapterTitle") {
            chapter = Some(chapter_title(item)?);
        } else if has_class(item, "course__tutorialList") {
            lessons_from_tutorial_list(chapter.as_deref(), item, out)?;
        } else {
            return Err(unexpected(item, "chapter"));
        }
    }
    Ok(())
}

/// Tutorial level: a tutorial-title child updates the current tutorial and
/// bumps the 1-based counter; a lesson-list child emits that tutorial's
/// lessons.
fn lessons_from_tutorial_list(
    chapter: Option<&str>,
    list: ElementRef,
    out: &mut Vec<Lesson>,
) -> Result<(), ParseError> {
    let mut tutorial: Option<String> = None;
    let mut tutorial_number = 0u32;
    for node in list.children() {
        let item = match ElementRef::wrap(node) {
            Some(item) => item,
            None => continue,
        };
        if has_class(item, "course__tutorialTitle") {
            tutorial = Some(item.text().collect::<String>().trim().to_string());
            tutorial_number += 1;
        } else if has_class(item, "course__lessonList") {
            lessons_from_lesson_list(chapter, tutorial.as_deref(), tutorial_number, item, out)?;
        } else {
            return Err(unexpected(item, "tutorial"));
        }
    }
    Ok(())
}

/// Lesson level: each lesson-title child yields one Lesson with the
/// inherited chapter/tutorial context and the next 1-based lesson number.
fn lessons_from_lesson_list(
    chapter: Option<&str>,
    tutorial: Option<&str>,
    tutorial_number: u32,
    list: ElementRef,
    out: &mut Vec<Lesson>,
) -> Result<(), ParseError> {
    let mut lesson_number = 0u32;
    for node in list.children() {
        let item = match ElementRef::wrap(node) {
            Some(item) => item,
            None => continue,
        };
        if has_class(item, "course__lessonTitle") {
            let lesson = item
                .value()
                .attr("title")
                .ok_or(ParseError::LessonTitleMissing)?;
            let lesson_url = item
                .select(&ANCHOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .ok_or_else(|| ParseError::LessonLinkMissing {
                    lesson: lesson.to_string(),
                })?;
            lesson_number += 1;
            out.push(Lesson {
                chapter: chapter.map(str::to_string),
                tutorial: tutorial.map(str::to_string),
                tutorial_number,
                lesson: lesson.to_string(),
                lesson_url: lesson_url.to_string(),
                lesson_number,
            });
        } else {
            return Err(unexpected(item, "lesson"));
        }
    }
    Ok(())
}

/// The chapter display name lives on the `title` attribute of an inner div,
/// not on the chapter-title element itself.
fn chapter_title(item: ElementRef) -> Result<String, ParseError> {
    item.select(&CHAPTER_TITLE_INNER)
        .next()
        .and_then(|inner| inner.value().attr("title"))
        .map(str::to_string)
        .ok_or(ParseError::ChapterTitleMissing)
}

fn has_class(item: ElementRef, class: &str) -> bool {
    item.value().classes().any(|c| c == class)
}

fn unexpected(item: ElementRef, level: &'static str) -> ParseError {
    let mut element = item.value().name().to_string();
    for class in item.value().classes() {
        element.push(' ');
        element.push_str(class);
    }
    ParseError::UnexpectedElement { element, level }
}
