//! `gtdl list` – print the course hierarchy without downloading.

use anyhow::Result;
use gtdl_core::config::Config;
use gtdl_core::course;
use gtdl_core::session::Session;

pub fn run_list(cfg: &Config) -> Result<()> {
    let mut session = Session::login(&cfg.user, &cfg.password)?;
    let lessons = course::get_lessons(&mut session, &cfg.course_url)?;

    let mut current_chapter: Option<&str> = None;
    let mut current_tutorial = 0u32;
    for lesson in &lessons {
        if lesson.chapter.as_deref() != current_chapter {
            current_chapter = lesson.chapter.as_deref();
            println!("{}", current_chapter.unwrap_or("?"));
            current_tutorial = 0;
        }
        if lesson.tutorial_number != current_tutorial {
            current_tutorial = lesson.tutorial_number;
            println!(
                "  {:02} - {}",
                lesson.tutorial_number,
                lesson.tutorial.as_deref().unwrap_or("?")
            );
        }
        println!("    {:02} - {}", lesson.lesson_number, lesson.lesson);
    }
    println!("{} lesson(s).", lessons.len());
    Ok(())
}
