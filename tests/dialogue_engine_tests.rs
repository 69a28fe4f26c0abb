//! End-to-end dialogue flows through the engine
//! Drives scenarios event by event and checks the persisted cursor after each turn

use std::sync::Arc;

use stepwise::{
    Affordance, DialogueEngine, DialogueState, EngineError, Event, NoOpReason, Outcome, Preface,
    ScenarioId, UserId,
    infrastructure::{
        FileSystemScenarioRepository, InMemoryDialogueStore, InMemoryScenarioRepository,
        JsonFileDialogueStore,
    },
    types::PendingTransition,
};

const FOUR_THEORY: &str = r#"{"name": "Basics", "steps": [
    {"type": "theory", "text": "one"},
    {"type": "theory", "text": "two"},
    {"type": "theory", "text": "three"},
    {"type": "theory", "text": "four"}
]}"#;

const ONE_PRACTICE: &str = r#"{"name": "Quiz", "steps": [
    {"type": "practice", "text": "Pick", "buttons": ["a", "b"], "correct_answer": "b"}
]}"#;

const REPEAT_BRANCH: &str = r#"{"name": "Loop", "steps": [
    {"type": "branch", "text": "Again?", "options": [
        {"text": "Yes", "response": "Once more", "repeat_step": true},
        {"text": "No", "response": "Moving on", "show_continue_button": false}
    ]},
    {"type": "theory", "text": "after"}
]}"#;

const INPUT_BRANCH: &str = r#"{"name": "Intro", "steps": [
    {"type": "branch_with_input", "text": "Tell me", "options": [
        {"text": "Name", "input_prompt": "Name?"}
    ]},
    {"type": "theory", "text": "Nice to meet you", "is_final": true}
]}"#;

fn engine() -> DialogueEngine {
    let scenarios = InMemoryScenarioRepository::new()
        .with_source("basics", FOUR_THEORY)
        .with_source("quiz", ONE_PRACTICE)
        .with_source("loop", REPEAT_BRANCH)
        .with_source("intro", INPUT_BRANCH);
    DialogueEngine::new(Arc::new(scenarios), Arc::new(InMemoryDialogueStore::new()))
}

async fn state_of(engine: &DialogueEngine, user: UserId) -> Option<DialogueState> {
    engine.current_state(user).await.unwrap()
}

#[tokio::test]
async fn four_theory_steps_complete_after_four_advances() {
    let engine = engine();
    let user = UserId::new(1);

    let outcome = engine.start_scenario(user, &ScenarioId::from("basics")).await.unwrap();
    assert_eq!(outcome.instruction().unwrap().text, "one");
    assert_eq!(state_of(&engine, user).await.unwrap().step_index, 0);

    for expected in 1..4 {
        let outcome = engine.handle_event(user, Event::Advance).await.unwrap();
        assert!(matches!(outcome, Outcome::Render(_)));
        assert_eq!(state_of(&engine, user).await.unwrap().step_index, expected);
    }

    let outcome = engine.handle_event(user, Event::Advance).await.unwrap();
    assert!(outcome.is_complete());
    assert!(state_of(&engine, user).await.is_none());
}

#[tokio::test]
async fn wrong_practice_answer_keeps_state() {
    let engine = engine();
    let user = UserId::new(2);
    engine.start_scenario(user, &ScenarioId::from("quiz")).await.unwrap();
    let before = state_of(&engine, user).await;

    for _ in 0..3 {
        let outcome = engine
            .handle_event(user, Event::Choose("a".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Incorrect { step_index: 0 });
        assert_eq!(state_of(&engine, user).await, before);
    }

    let outcome = engine
        .handle_event(user, Event::Choose("b".to_string()))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Complete {
            preface: Some(Preface::CorrectAnswer)
        }
    );
}

#[tokio::test]
async fn repeating_branch_option_stays_on_step() {
    let engine = engine();
    let user = UserId::new(3);
    engine.start_scenario(user, &ScenarioId::from("loop")).await.unwrap();

    let outcome = engine.handle_event(user, Event::SelectOption(0)).await.unwrap();
    let instruction = outcome.instruction().unwrap();
    assert_eq!(instruction.text, "Again?");
    assert_eq!(instruction.preface, Some(Preface::Response("Once more".to_string())));
    assert_eq!(state_of(&engine, user).await.unwrap().step_index, 0);

    let outcome = engine.handle_event(user, Event::SelectOption(1)).await.unwrap();
    let instruction = outcome.instruction().unwrap();
    assert_eq!(instruction.text, "after");
    assert_eq!(instruction.preface, Some(Preface::Response("Moving on".to_string())));
    assert_eq!(state_of(&engine, user).await.unwrap().step_index, 1);
}

#[tokio::test]
async fn branch_with_input_passes_through_pending_state() {
    let engine = engine();
    let user = UserId::new(4);
    engine.start_scenario(user, &ScenarioId::from("intro")).await.unwrap();

    let outcome = engine.handle_event(user, Event::SelectOption(0)).await.unwrap();
    let instruction = outcome.instruction().unwrap();
    assert_eq!(instruction.text, "Name?");
    assert!(instruction.expects_text());

    let state = state_of(&engine, user).await.unwrap();
    assert_eq!(state.step_index, 0);
    assert_eq!(
        state.pending,
        Some(PendingTransition::AwaitingBranchInput { next_step: 1 })
    );

    let outcome = engine
        .handle_event(user, Event::TextInput("Ann".to_string()))
        .await
        .unwrap();
    let instruction = outcome.instruction().unwrap();
    assert_eq!(instruction.affordance, Affordance::None);
    assert_eq!(instruction.preface, Some(Preface::AnswerReceived));

    let state = state_of(&engine, user).await.unwrap();
    assert_eq!(state.step_index, 1);
    assert!(state.pending.is_none());
}

#[tokio::test]
async fn completed_scenario_needs_restart() {
    let engine = engine();
    let user = UserId::new(5);
    engine.start_scenario(user, &ScenarioId::from("quiz")).await.unwrap();
    engine
        .handle_event(user, Event::Choose("b".to_string()))
        .await
        .unwrap();

    let outcome = engine.handle_event(user, Event::Advance).await.unwrap();
    assert_eq!(outcome, Outcome::NoOp(NoOpReason::NoActiveScenario));

    let outcome = engine.start_scenario(user, &ScenarioId::from("quiz")).await.unwrap();
    assert_eq!(outcome.instruction().unwrap().text, "Pick");
}

#[tokio::test]
async fn starting_again_discards_pending_branch() {
    let engine = engine();
    let user = UserId::new(6);
    engine.start_scenario(user, &ScenarioId::from("intro")).await.unwrap();
    engine.handle_event(user, Event::SelectOption(0)).await.unwrap();

    engine.start_scenario(user, &ScenarioId::from("basics")).await.unwrap();
    let state = state_of(&engine, user).await.unwrap();
    assert_eq!(state, DialogueState::new("basics".to_string()));
}

#[tokio::test]
async fn users_progress_independently() {
    let engine = Arc::new(engine());
    let first = UserId::new(10);
    let second = UserId::new(11);

    engine.start_scenario(first, &ScenarioId::from("basics")).await.unwrap();
    engine.start_scenario(second, &ScenarioId::from("basics")).await.unwrap();

    let a = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.handle_event(first, Event::Advance).await }
    });
    let b = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.handle_event(second, Event::Continue).await }
    });
    a.await.unwrap().unwrap();
    let outcome = b.await.unwrap().unwrap();

    assert_eq!(outcome, Outcome::NoOp(NoOpReason::UnexpectedEvent));
    assert_eq!(state_of(&engine, first).await.unwrap().step_index, 1);
    assert_eq!(state_of(&engine, second).await.unwrap().step_index, 0);
}

#[tokio::test]
async fn file_store_survives_engine_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let user = UserId::new(42);
    let scenarios = || InMemoryScenarioRepository::new().with_source("basics", FOUR_THEORY);

    {
        let engine = DialogueEngine::new(
            Arc::new(scenarios()),
            Arc::new(JsonFileDialogueStore::new(temp_dir.path())),
        );
        engine.start_scenario(user, &ScenarioId::from("basics")).await.unwrap();
        engine.handle_event(user, Event::Advance).await.unwrap();
    }

    let engine = DialogueEngine::new(
        Arc::new(scenarios()),
        Arc::new(JsonFileDialogueStore::new(temp_dir.path())),
    );
    let outcome = engine.handle_event(user, Event::Advance).await.unwrap();
    assert_eq!(outcome.instruction().unwrap().text, "three");
}

fn file_engine(dir: &std::path::Path) -> DialogueEngine {
    DialogueEngine::new(
        Arc::new(FileSystemScenarioRepository::new(dir)),
        Arc::new(InMemoryDialogueStore::new()),
    )
}

#[tokio::test]
async fn shortened_scenario_drops_saved_position() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("basics.json");
    std::fs::write(&path, FOUR_THEORY).unwrap();
    let engine = file_engine(temp_dir.path());
    let id = ScenarioId::from("basics");
    let user = UserId::new(50);

    engine.start_scenario(user, &id).await.unwrap();
    engine.handle_event(user, Event::Advance).await.unwrap();
    engine.handle_event(user, Event::Advance).await.unwrap();

    std::fs::write(
        &path,
        r#"{"name": "Basics", "steps": [{"type": "theory", "text": "only"}]}"#,
    )
    .unwrap();
    engine.reload(&id).await;

    let error = engine.handle_event(user, Event::Advance).await.unwrap_err();
    assert!(matches!(error, EngineError::StaleState { step: 2, .. }));
    assert!(state_of(&engine, user).await.is_none());

    let outcome = engine.start_scenario(user, &id).await.unwrap();
    assert_eq!(outcome.instruction().unwrap().text, "only");
}

#[tokio::test]
async fn resume_after_edit_drops_saved_position() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("basics.json");
    std::fs::write(&path, FOUR_THEORY).unwrap();
    let engine = file_engine(temp_dir.path());
    let user = UserId::new(51);

    engine.start_scenario(user, &ScenarioId::from("basics")).await.unwrap();
    engine.handle_event(user, Event::Advance).await.unwrap();

    std::fs::write(
        &path,
        r#"{"name": "Basics", "steps": [{"type": "theory", "text": "only"}]}"#,
    )
    .unwrap();
    engine.invalidate_cache().await;

    let error = engine.resume(user).await.unwrap_err();
    assert!(error.is_stale_state());
    assert!(state_of(&engine, user).await.is_none());
}

#[tokio::test]
async fn deleted_scenario_clears_state() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("basics.json");
    std::fs::write(&path, FOUR_THEORY).unwrap();
    let engine = file_engine(temp_dir.path());
    let id = ScenarioId::from("basics");
    let user = UserId::new(52);

    engine.start_scenario(user, &id).await.unwrap();
    std::fs::remove_file(&path).unwrap();
    engine.reload(&id).await;

    let error = engine.handle_event(user, Event::Advance).await.unwrap_err();
    assert!(error.is_not_found());
    assert!(state_of(&engine, user).await.is_none());

    let outcome = engine.handle_event(user, Event::Advance).await.unwrap();
    assert_eq!(outcome, Outcome::NoOp(NoOpReason::NoActiveScenario));
}
