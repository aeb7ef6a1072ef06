//! `gtdl run` – crawl the course and download every missing lesson, in order.

use anyhow::Result;
use gtdl_core::config::Config;
use gtdl_core::course;
use gtdl_core::downloader;
use gtdl_core::session::Session;

pub fn run_download(cfg: &Config) -> Result<()> {
    let mut session = Session::login(&cfg.user, &cfg.password)?;
    let lessons = course::get_lessons(&mut session, &cfg.course_url)?;
    if lessons.is_empty() {
        println!("No lessons found.");
        return Ok(());
    }

    let total = lessons.len();
    for (i, lesson) in lessons.iter().enumerate() {
        println!(
            "[{}/{}] {} / {:02} - {} / {:02} - {}",
            i + 1,
            total,
            lesson.chapter.as_deref().unwrap_or("?"),
            lesson.tutorial_number,
            lesson.tutorial.as_deref().unwrap_or("?"),
            lesson.lesson_number,
            lesson.lesson,
        );
        downloader::download_lesson(&mut session, lesson, &cfg.basedir)?;
    }

    tracing::info!("run completed {} lesson(s)", total);
    Ok(())
}
