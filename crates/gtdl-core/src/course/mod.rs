//! Course page crawling: chapters, tutorials, lessons.

mod parse;

pub use parse::{lessons_from_course, ParseError};

use anyhow::Result;

use crate::session::Session;

/// One downloadable lesson, in course document order.
///
/// `chapter` and `tutorial` are `None` only when the markup put a lesson
/// before any title element; the downloader treats that as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub chapter: Option<String>,
    pub tutorial: Option<String>,
    /// 1-based index of the tutorial within its chapter, by appearance order.
    pub tutorial_number: u32,
    /// Display title of the lesson.
    pub lesson: String,
    /// Relative URL of the lesson detail page.
    pub lesson_url: String,
    /// 1-based index of the lesson within its tutorial, by appearance order.
    pub lesson_number: u32,
}

/// Fetches the course page and returns its lessons in document order.
pub fn get_lessons(session: &mut Session, course_url: &str) -> Result<Vec<Lesson>> {
    let html = session.get_text(course_url)?;
    let lessons = lessons_from_course(&html)?;
    tracing::info!("course page yielded {} lesson(s)", lessons.len());
    Ok(lessons)
}
