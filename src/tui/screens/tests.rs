use super::*;
use crate::api::{ApiError, Difficulty, InterviewMode, ResumeAnalysis};
use crate::orchestrator::{FeedbackResult, InterviewConfiguration};
use serde_json::json;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(screen: &mut Screen, text: &str) {
    for c in text.chars() {
        screen.on_key(key(KeyCode::Char(c)));
    }
}

fn configured_state(stage: WorkflowStage) -> OrchestratorState {
    OrchestratorState {
        stage,
        configuration: Some(InterviewConfiguration::new(json!({
            "session_id": 42,
            "role": "Backend Engineer",
            "difficulty": "advanced",
            "questions": {
                "technical_questions": ["What is a mutex?"],
                "hr_questions": ["Tell me about yourself."]
            }
        }))),
        feedback: None,
    }
}

fn session_screen() -> Screen {
    Screen::for_state(&configured_state(WorkflowStage::InterviewSession))
        .expect("session screen")
}

#[test]
fn test_mode_selection_keys() {
    let mut screen = Screen::for_state(&OrchestratorState::default()).expect("mode screen");

    assert_eq!(
        screen.on_key(key(KeyCode::Enter)),
        ScreenAction::Request(StageRequest::ChooseResumeMode)
    );
    screen.on_key(key(KeyCode::Down));
    screen.on_key(key(KeyCode::Down));
    assert_eq!(
        screen.on_key(key(KeyCode::Enter)),
        ScreenAction::Request(StageRequest::ChooseRoleMode)
    );
    assert_eq!(
        screen.on_key(key(KeyCode::Char('1'))),
        ScreenAction::Request(StageRequest::ChooseResumeMode)
    );
}

#[test]
fn test_payload_stages_need_their_payload() {
    let setup = OrchestratorState {
        stage: WorkflowStage::InterviewSetup,
        ..OrchestratorState::default()
    };
    assert_eq!(
        Screen::for_state(&setup).err(),
        Some("no interview configuration")
    );

    let no_session = OrchestratorState {
        stage: WorkflowStage::InterviewSession,
        configuration: Some(InterviewConfiguration::new(json!({"role": "x"}))),
        feedback: None,
    };
    assert_eq!(
        Screen::for_state(&no_session).err(),
        Some("configuration has no session id")
    );

    let feedback = OrchestratorState {
        stage: WorkflowStage::Feedback,
        ..OrchestratorState::default()
    };
    assert_eq!(Screen::for_state(&feedback).err(), Some("no feedback result"));
}

#[test]
fn test_role_screen_requires_role() {
    let mut screen = Screen::RoleSelection(RoleSelectionScreen::default());

    assert_eq!(screen.on_key(key(KeyCode::Enter)), ScreenAction::None);
    let Screen::RoleSelection(role) = &screen else {
        panic!("expected role screen");
    };
    assert_eq!(role.error.as_deref(), Some("Enter a job role"));

    type_text(&mut screen, "SRE");
    screen.on_key(key(KeyCode::Tab));
    let action = screen.on_key(key(KeyCode::Enter));
    assert_eq!(
        action,
        ScreenAction::Call(ApiCall::GenerateQuestions(QuestionRequest {
            mode: InterviewMode::Role,
            difficulty: Difficulty::Advanced,
            role: "SRE".to_string(),
            keywords: Vec::new(),
        }))
    );

    // Typing is ignored while the request is in flight
    type_text(&mut screen, "zzz");
    let Screen::RoleSelection(role) = &screen else {
        panic!("expected role screen");
    };
    assert_eq!(role.role.value(), "SRE");
    assert!(role.generating);
}

#[test]
fn test_generated_questions_become_configuration() {
    let mut screen = Screen::RoleSelection(RoleSelectionScreen::default());
    let request = QuestionRequest {
        mode: InterviewMode::Role,
        difficulty: Difficulty::Beginner,
        role: "QA".to_string(),
        keywords: Vec::new(),
    };

    let action = screen.on_api(ApiOutcome::QuestionsGenerated {
        request: request.clone(),
        result: Ok(json!({"session_id": 7, "questions": {}})),
    });
    let ScreenAction::Request(StageRequest::ConfigurationReady(config)) = action else {
        panic!("expected configuration, got {:?}", action);
    };
    assert_eq!(config.as_json()["session_id"], 7);
    assert_eq!(config.as_json()["role"], "QA");
    assert_eq!(config.as_json()["mode"], "role");
}

#[test]
fn test_generated_questions_without_session_id_stay_on_screen() {
    let mut screen = Screen::RoleSelection(RoleSelectionScreen::default());
    let request = QuestionRequest {
        mode: InterviewMode::Role,
        difficulty: Difficulty::Beginner,
        role: "QA".to_string(),
        keywords: Vec::new(),
    };

    let action = screen.on_api(ApiOutcome::QuestionsGenerated {
        request,
        result: Ok(json!({"questions": {}})),
    });
    assert_eq!(action, ScreenAction::None);
    let Screen::RoleSelection(role) = &screen else {
        panic!("expected role screen");
    };
    assert!(role.error.as_deref().unwrap_or("").contains("session id"));
    assert!(!role.generating);
}

#[test]
fn test_resume_upload_then_generate() {
    let mut screen = Screen::ResumeUpload(ResumeUploadScreen::default());

    assert_eq!(screen.on_key(key(KeyCode::Enter)), ScreenAction::None);

    screen.on_paste("/tmp/cv.pdf\n");
    assert_eq!(
        screen.on_key(key(KeyCode::Enter)),
        ScreenAction::Call(ApiCall::UploadResume(PathBuf::from("/tmp/cv.pdf")))
    );

    screen.on_api(ApiOutcome::ResumeAnalyzed(Ok(ResumeAnalysis {
        filename: "cv.pdf".to_string(),
        keywords: vec!["rust".to_string(), "tokio".to_string()],
    })));

    let action = screen.on_key(key(KeyCode::Enter));
    let ScreenAction::Call(ApiCall::GenerateQuestions(request)) = action else {
        panic!("expected generate call, got {:?}", action);
    };
    assert_eq!(request.mode, InterviewMode::Resume);
    assert_eq!(request.keywords, vec!["rust", "tokio"]);
    assert!(request.role.is_empty());
}

#[test]
fn test_resume_edit_discards_analysis() {
    let mut upload = ResumeUploadScreen::default();
    upload.path.paste("/tmp/a.pdf");
    upload.analysis = Some(ResumeAnalysis {
        filename: "a.pdf".to_string(),
        keywords: vec![],
    });

    upload.on_key(key(KeyCode::Backspace));
    assert!(upload.analysis.is_none());
    assert_eq!(upload.path.value(), "/tmp/a.pd");
}

#[test]
fn test_resume_upload_error_is_shown() {
    let mut upload = ResumeUploadScreen::default();
    upload.path.paste("/tmp/cv.docx");
    upload.on_key(key(KeyCode::Enter));

    upload.on_api(ApiOutcome::ResumeAnalyzed(Err(ApiError::InvalidInput {
        message: "Please upload a PDF file".to_string(),
    })));
    assert_eq!(upload.error.as_deref(), Some("Please upload a PDF file"));
    assert!(upload.analysis.is_none());
}

#[test]
fn test_intake_escape_goes_back() {
    let mut screen = Screen::ResumeUpload(ResumeUploadScreen::default());
    assert_eq!(
        screen.on_key(key(KeyCode::Esc)),
        ScreenAction::Request(StageRequest::Back)
    );
}

#[test]
fn test_setup_begins_session() {
    let mut screen =
        Screen::for_state(&configured_state(WorkflowStage::InterviewSetup)).expect("setup");
    assert_eq!(
        screen.on_key(key(KeyCode::Enter)),
        ScreenAction::Request(StageRequest::BeginSession)
    );
}

#[test]
fn test_session_walks_questions_in_order() {
    let mut screen = session_screen();
    let Screen::InterviewSession(session) = &screen else {
        panic!("expected session screen");
    };
    assert_eq!(
        session.current_question().map(|q| q.text.as_str()),
        Some("Tell me about yourself.")
    );

    assert_eq!(screen.on_key(key(KeyCode::Enter)), ScreenAction::None);

    type_text(&mut screen, "I build things");
    assert_eq!(
        screen.on_key(key(KeyCode::Enter)),
        ScreenAction::Call(ApiCall::SubmitAnswer {
            session_id: 42,
            index: 0,
            answer: "I build things".to_string(),
        })
    );

    assert_eq!(
        screen.on_api(ApiOutcome::AnswerSubmitted {
            index: 0,
            result: Ok(()),
        }),
        ScreenAction::None
    );

    type_text(&mut screen, "A lock");
    screen.on_key(key(KeyCode::Enter));
    let action = screen.on_api(ApiOutcome::AnswerSubmitted {
        index: 1,
        result: Ok(()),
    });
    assert_eq!(
        action,
        ScreenAction::Call(ApiCall::CompleteInterview { session_id: 42 })
    );

    let Screen::InterviewSession(session) = &screen else {
        panic!("expected session screen");
    };
    assert_eq!(session.phase, SessionPhase::Completing);
}

#[test]
fn test_session_submit_failure_keeps_answer() {
    let mut screen = session_screen();
    type_text(&mut screen, "draft");
    screen.on_key(key(KeyCode::Enter));

    screen.on_api(ApiOutcome::AnswerSubmitted {
        index: 0,
        result: Err(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }),
    });

    let Screen::InterviewSession(session) = &screen else {
        panic!("expected session screen");
    };
    assert_eq!(session.current, 0);
    assert_eq!(session.answer.value(), "draft");
    assert_eq!(session.phase, SessionPhase::Answering);
    assert!(session.error.as_deref().unwrap_or("").contains("boom"));
}

#[test]
fn test_session_can_finish_early_and_reports_feedback() {
    let mut screen = session_screen();
    let finish = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
    assert_eq!(
        screen.on_key(finish),
        ScreenAction::Call(ApiCall::CompleteInterview { session_id: 42 })
    );

    let feedback = json!({"overall_score": 7.5});
    assert_eq!(
        screen.on_api(ApiOutcome::InterviewCompleted(Ok(feedback.clone()))),
        ScreenAction::Request(StageRequest::SessionComplete(FeedbackResult::new(feedback)))
    );
}

#[test]
fn test_feedback_restart() {
    let state = OrchestratorState {
        stage: WorkflowStage::Feedback,
        feedback: Some(FeedbackResult::new(json!({"strengths": ["clear"]}))),
        ..configured_state(WorkflowStage::Feedback)
    };
    let mut screen = Screen::for_state(&state).expect("feedback screen");
    let Screen::Feedback(feedback) = &screen else {
        panic!("expected feedback screen");
    };
    assert_eq!(feedback.report.strengths, vec!["clear"]);

    assert_eq!(
        screen.on_key(key(KeyCode::Char('r'))),
        ScreenAction::Request(StageRequest::Restart)
    );
}

#[test]
fn test_stray_reply_is_ignored() {
    let mut screen = Screen::Unavailable;
    let action = screen.on_api(ApiOutcome::InterviewCompleted(Ok(json!({}))));
    assert_eq!(action, ScreenAction::None);
}

#[test]
fn test_text_input_paste_flattens_lines() {
    let mut input = TextInput::default();
    input.paste("line one\r\nline two\n");
    assert_eq!(input.value(), "line one  line two");

    let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
    assert!(!input.handle_key(ctrl_a));
    input.clear();
    assert_eq!(input.value(), "");
}
