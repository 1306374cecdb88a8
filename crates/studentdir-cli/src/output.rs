//! Plain-text rendering of students and courses.

use studentdir_core::utils::truncate_string;
use studentdir_core::Student;

// ============================================================================
// Constants
// ============================================================================

const ID_WIDTH: usize = 8;
const NAME_WIDTH: usize = 22;
const EMAIL_WIDTH: usize = 28;
const COURSE_WIDTH: usize = 18;

pub fn print_table(students: &[Student]) {
    if students.is_empty() {
        println!("No students found.");
        return;
    }

    println!(
        "{:<id$}  {:<name$}  {:<email$}  {:<course$}  YEAR",
        "ID",
        "NAME",
        "EMAIL",
        "COURSE",
        id = ID_WIDTH,
        name = NAME_WIDTH,
        email = EMAIL_WIDTH,
        course = COURSE_WIDTH,
    );
    for s in students {
        println!(
            "{:<id$}  {:<name$}  {:<email$}  {:<course$}  {}",
            truncate_string(&s.id, ID_WIDTH),
            truncate_string(&s.name, NAME_WIDTH),
            truncate_string(&s.email, EMAIL_WIDTH),
            truncate_string(&s.course, COURSE_WIDTH),
            s.year,
            id = ID_WIDTH,
            name = NAME_WIDTH,
            email = EMAIL_WIDTH,
            course = COURSE_WIDTH,
        );
    }
    println!("\n{} student(s)", students.len());
}

pub fn print_student(student: &Student) {
    println!("ID:     {}", student.id);
    println!("Name:   {}", student.name);
    println!("Email:  {}", student.email);
    println!("Course: {}", student.course);
    println!("Year:   {}", student.display_year());
    println!("Photo:  {}", student.photo_url);
    if student.has_notes() {
        println!("Notes:  {}", student.notes);
    }
}

pub fn print_courses(courses: &[String]) {
    if courses.is_empty() {
        println!("No courses.");
    }
    for course in courses {
        println!("{}", course);
    }
}
