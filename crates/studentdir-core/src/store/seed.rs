use crate::models::Student;

fn seed(
    id: &str,
    name: &str,
    email: &str,
    course: &str,
    year: u8,
    img: u32,
    notes: &str,
) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        course: course.to_string(),
        year,
        photo_url: format!("https://i.pravatar.cc/150?img={}", img),
        notes: notes.to_string(),
    }
}

/// Records written on the first load of an empty medium.
pub fn seed_students() -> Vec<Student> {
    vec![
        seed(
            "1",
            "Alice Wonderland",
            "alice.wonder@example.com",
            "Computer Science",
            3,
            1,
            "Excellent in algorithms.",
        ),
        seed(
            "2",
            "Bob The Builder",
            "bob.builder@example.com",
            "Engineering",
            2,
            2,
            "Great at practicals.",
        ),
        seed(
            "3",
            "Charlie Chaplin",
            "charlie.chap@example.com",
            "Arts",
            4,
            3,
            "Creative and expressive.",
        ),
        seed(
            "4",
            "Diana Prince",
            "diana.prince@example.com",
            "Computer Science",
            2,
            4,
            "Focuses on cybersecurity.",
        ),
        seed(
            "5",
            "Edward Scissorhands",
            "edward.sc@example.com",
            "Arts",
            1,
            5,
            "Talented but shy.",
        ),
        seed(
            "6",
            "Fiona Gallagher",
            "fiona.gallagher@example.com",
            "Business",
            3,
            6,
            "Strong leadership skills.",
        ),
    ]
}
