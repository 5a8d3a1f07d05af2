//! Output formatting for the non-interactive listings

use crate::catalog::{CourseEntry, Exam, ExamId, FileRow};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Summary printed after the exam id:
/// `2021H, author, title, N fichier(s)`
fn format_exam_details(exam: &Exam) -> String {
    let mut s = format!(
        "{}, {}, {}, {} fichier(s)",
        exam.term(),
        exam.author_or_placeholder(),
        exam.title_or_placeholder(),
        exam.files.len()
    );
    if let Some(date) = &exam.date_added {
        s.push_str(&format!(", ajouté le {}", date));
    }
    s
}

/// Print courses as `CODE  name`
pub fn print_courses(courses: &[CourseEntry], color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    for course in courses {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(stdout, "{:<10}", course.display_code())?;
        stdout.reset()?;
        writeln!(stdout, "  {}", course.name)?;
    }

    Ok(())
}

/// Print a course heading followed by its exams.
///
/// The rows of `expanded` are printed under their exam.
pub fn print_exams(
    code: &str,
    name: &str,
    exams: &[Exam],
    expanded: Option<(ExamId, &[FileRow])>,
    color: bool,
) -> io::Result<()> {
    let mut stdout = stdout(color);

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    write!(stdout, "{}", code.to_uppercase())?;
    stdout.reset()?;
    writeln!(stdout, " {}", name)?;

    for exam in exams {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "[{}]", exam.id)?;
        stdout.reset()?;
        writeln!(stdout, " {}", format_exam_details(exam))?;

        if let Some((id, rows)) = expanded
            && id == exam.id
        {
            for row in rows {
                print_file_row(&mut stdout, row)?;
            }
        }
    }

    Ok(())
}

fn print_file_row(stdout: &mut StandardStream, row: &FileRow) -> io::Result<()> {
    write!(stdout, "    ")?;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    write!(stdout, "{}", row.label())?;
    stdout.reset()?;
    writeln!(stdout, "  {}", row.path)?;
    Ok(())
}

/// Report a redirect to the index
pub fn print_redirect(reason: &str, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    write!(stdout, "redirect")?;
    stdout.reset()?;
    writeln!(stdout, " / ({})", reason)?;
    Ok(())
}
