use prep_core::time::fixed_clock;
use services::{DEFAULT_QUIZ_SIZE, QuestionBank, QuizService};

// A miniature bank: three questions tagged Domain 2, two tagged Domain 5,
// one with a correct_answer key missing from its options.
const BANK: &str = r#"{
    "total_questions": 5,
    "questions_by_domain": { "Domain 2": 3, "Domain 5": 2 },
    "questions": [
        { "number": 10, "domain": "Domain 2", "question": "Which control is preventive?",
          "options": { "A": "Fences", "B": "Audit logs", "C": "After-action reviews" },
          "correct_answer": "A", "explanation": "Fences deter and delay before an event." },
        { "number": 11, "domain": "Domain 2", "question": "Which document drives long-range planning?",
          "options": { "A": "Incident report", "B": "Security master plan" },
          "correct_answer": "B", "explanation": "The master plan aligns programs with goals." },
        { "number": 12, "domain": "Domain 2", "question": "Broken record with a missing answer key?",
          "options": { "A": "First option", "B": "Second option" },
          "correct_answer": "Z", "explanation": "Key is absent on purpose." },
        { "number": 20, "domain": "Domain 5", "question": "What is the outermost line of defense?",
          "options": { "A": "Interior spaces", "B": "Perimeter" },
          "correct_answer": "B", "explanation": "Perimeter comes first." },
        { "number": 21, "domain": "Domain 5", "question": "CPTED is primarily about what?",
          "options": { "A": "Environmental design", "B": "Encryption" },
          "correct_answer": "A", "explanation": "Design influences offender behavior." }
    ]
}"#;

#[test]
fn chapter_quiz_uses_exactly_the_matching_questions() {
    let bank = QuestionBank::from_json(BANK).unwrap();
    let service = QuizService::new(fixed_clock());

    let session = service.generate(&bank, 2, DEFAULT_QUIZ_SIZE);
    assert_eq!(session.total_questions(), 3);
    let mut numbers: Vec<u32> = session.questions().iter().map(|q| q.number()).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, vec![10, 11, 12]);

    let empty = service.generate(&bank, 9, DEFAULT_QUIZ_SIZE);
    assert_eq!(empty.chapter_number(), 9);
    assert_eq!(empty.total_questions(), 0);
    assert!(!empty.is_completed());
}

#[test]
fn missing_answer_key_falls_back_to_first_option() {
    let bank = QuestionBank::from_json(BANK).unwrap();
    let service = QuizService::new(fixed_clock());

    let session = service.generate(&bank, 2, DEFAULT_QUIZ_SIZE);
    let broken = session
        .questions()
        .iter()
        .find(|q| q.number() == 12)
        .expect("question present");
    assert_eq!(broken.correct_index(), 0);
}

#[test]
fn answering_a_generated_quiz_scores_correct_selections() {
    let bank = QuestionBank::from_json(BANK).unwrap();
    let service = QuizService::new(fixed_clock());

    let mut session = service.generate(&bank, 5, DEFAULT_QUIZ_SIZE);
    assert_eq!(session.total_questions(), 2);

    // Answer every question with its correct index.
    for index in 0..session.total_questions() {
        let correct = session.questions()[index].correct_index();
        session.select_answer(index, correct).unwrap();
    }

    assert_eq!(session.complete(), 2);
    assert!(session.is_completed());
    assert!(session.select_answer(0, 0).is_err());
}
