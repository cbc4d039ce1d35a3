use super::*;
use serde_json::json;

#[test]
fn test_identity_requires_username_only() {
    let identity: Identity = serde_json::from_value(json!({"username": "alice"})).unwrap();
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.id, None);
    assert_eq!(identity.email, None);

    let full: Identity = serde_json::from_value(json!({
        "id": 7,
        "username": "bob",
        "email": "bob@example.com"
    }))
    .unwrap();
    assert_eq!(full.id, Some(7));
    assert_eq!(full.email.as_deref(), Some("bob@example.com"));

    assert!(serde_json::from_value::<Identity>(json!({"name": "alice"})).is_err());
}

#[test]
fn test_question_request_wire_format() {
    let request = QuestionRequest {
        mode: InterviewMode::Role,
        difficulty: Difficulty::Advanced,
        role: "Data Scientist".to_string(),
        keywords: vec![],
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "mode": "role",
            "difficulty": "advanced",
            "role": "Data Scientist",
            "keywords": []
        })
    );
}

#[test]
fn test_into_configuration_merges_generated_fields() {
    let request = QuestionRequest {
        mode: InterviewMode::Resume,
        difficulty: Difficulty::Beginner,
        role: String::new(),
        keywords: vec!["rust".to_string()],
    };
    let configuration = request.into_configuration(json!({
        "session_id": 12,
        "questions": {"hr_questions": ["Tell me about yourself."]}
    }));

    let config = configuration.as_json();
    assert_eq!(config["mode"], "resume");
    assert_eq!(config["difficulty"], "beginner");
    assert_eq!(config["keywords"], json!(["rust"]));
    assert_eq!(config["session_id"], 12);
}

#[test]
fn test_flatten_questions_uses_backend_order() {
    let categories = json!({
        "cultural_questions": ["C1"],
        "technical_questions": ["T1", "T2"],
        "hr_questions": ["H1"],
        "bonus_round": ["B1"]
    });
    let questions = flatten_questions(categories.as_object().unwrap());

    let texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["H1", "T1", "T2", "C1", "B1"]);
    assert_eq!(questions[0].category, "Hr Questions");
    assert_eq!(questions[1].category, "Technical Questions");
    assert_eq!(questions[4].category, "Bonus Round");
}

#[test]
fn test_flatten_questions_ignores_sorted_wire_order() {
    // Key order as the backend serializes it: alphabetical
    let body = r#"{"cultural_questions": ["C1"], "hr_questions": ["H1", "H2"], "technical_questions": ["T1"]}"#;
    let categories: Map<String, Value> = serde_json::from_str(body).unwrap();
    let questions = flatten_questions(&categories);

    let texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["H1", "H2", "T1", "C1"]);
}

#[test]
fn test_interview_plan_from_configuration() {
    let configuration = InterviewConfiguration::new(json!({
        "mode": "role",
        "role": "Backend Engineer",
        "difficulty": "intermediate",
        "session_id": 3,
        "questions": {
            "hr_questions": ["Why this role?"],
            "technical_questions": ["Explain ownership."]
        }
    }));

    let plan = InterviewPlan::from_configuration(&configuration).expect("plan");
    assert_eq!(plan.session_id, 3);
    assert_eq!(plan.role, "Backend Engineer");
    assert_eq!(plan.questions.len(), 2);
}

#[test]
fn test_interview_plan_without_session_is_none() {
    let configuration = InterviewConfiguration::new(json!({"mode": "resume"}));
    assert!(InterviewPlan::from_configuration(&configuration).is_none());
}

#[test]
fn test_feedback_report_is_lenient() {
    let result = FeedbackResult::new(json!({
        "overall_score": 82,
        "category_scores": {"hr_performance": 90, "technical_performance": 75},
        "strengths": ["Clear answers"]
    }));
    let report = FeedbackReport::from_result(&result);

    assert_eq!(report.overall_score, Some(82.0));
    assert_eq!(report.strengths, vec!["Clear answers".to_string()]);
    assert!(report.improvements.is_empty());
    assert_eq!(
        report.scores(),
        vec![
            ("Hr Performance".to_string(), 90.0),
            ("Technical Performance".to_string(), 75.0)
        ]
    );

    let garbage = FeedbackReport::from_result(&FeedbackResult::new(json!("not an object")));
    assert_eq!(garbage, FeedbackReport::default());
}

#[test]
fn test_difficulty_cycles() {
    let mut level = Difficulty::default();
    assert_eq!(level, Difficulty::Intermediate);
    level = level.next();
    assert_eq!(level.label(), "Advanced");
    level = level.next();
    assert_eq!(level, Difficulty::Beginner);
}
