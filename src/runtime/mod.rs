//! Step interpreter
//!
//! A pure transition function over `(DialogueState, ScenarioDocument, Event)`.
//! Nothing here performs I/O or mutates its inputs: every call returns a
//! [`Transition`] holding the replacement state (or `None` when the scenario is
//! complete and the state must be discarded) and the [`Outcome`] to present.

use crate::types::{
    event::Event,
    output::{Affordance, NoOpReason, Outcome, Preface, RenderInstruction, Transition},
    scenario::{BranchOption, InputOption, ScenarioDocument, Step, StepKind},
    state::{DialogueState, PendingTransition},
};
use log::{debug, info};


/// Begin a scenario at its first step
pub fn start(doc: &ScenarioDocument) -> Transition {
    info!("[Start] scenario={} steps={}", doc.id, doc.len());
    render(doc, &DialogueState::new(doc.id.clone()), None)
}

/// Render the step the state points at
///
/// A cursor past the last step is the only terminal condition.
pub fn render(doc: &ScenarioDocument, state: &DialogueState, preface: Option<Preface>) -> Transition {
    debug_assert!(
        state.step_index <= doc.len(),
        "step index {} beyond scenario '{}' of {} steps",
        state.step_index,
        doc.id,
        doc.len()
    );

    match doc.get_step(state.step_index) {
        Some(step) => {
            let instruction = instruction_for(step, state.step_index).with_preface(preface);
            Transition::keep(state, Outcome::Render(instruction))
        }
        None => {
            info!("[Complete] scenario={} at step={}", doc.id, state.step_index);
            Transition {
                state: None,
                outcome: Outcome::Complete { preface },
            }
        }
    }
}

/// Apply one user event to the current state
pub fn step(state: &DialogueState, doc: &ScenarioDocument, event: &Event) -> Transition {
    debug_assert_eq!(state.scenario_id, doc.id, "state belongs to another scenario");
    debug!(
        "[Step] scenario={} step={} pending={:?} event={}",
        doc.id,
        state.step_index,
        state.pending,
        event.name()
    );

    if let Some(pending) = state.pending {
        return resolve_pending(state, doc, pending, event);
    }

    // A cursor already past the end can only complete
    let Some(current) = doc.get_step(state.step_index) else {
        return render(doc, state, None);
    };

    match (&current.kind, event) {
        (StepKind::Theory, Event::Advance) => advance(doc, state, None),

        (
            StepKind::Practice {
                choices,
                correct_choice,
            },
            Event::Choose(answer),
        ) => {
            if choices.contains(answer) {
                check_answer(doc, state, correct_choice, answer)
            } else {
                ignore(state, NoOpReason::StaleEvent)
            }
        }
        (
            StepKind::Practice {
                choices,
                correct_choice,
            },
            Event::SelectOption(index),
        ) => match choices.get(*index) {
            Some(answer) => check_answer(doc, state, correct_choice, answer),
            None => ignore(state, NoOpReason::StaleEvent),
        },

        (StepKind::TextAnswer { .. }, Event::TextInput(_)) => {
            advance(doc, state, Some(Preface::AnswerReceived))
        }

        (StepKind::Branch { options }, Event::SelectOption(index)) => match options.get(*index) {
            Some(option) => select_branch(doc, state, current, option),
            None => ignore(state, NoOpReason::StaleEvent),
        },

        (StepKind::BranchWithInput { options }, Event::SelectOption(index)) => {
            match options.get(*index) {
                Some(option) => request_input(state, option),
                None => ignore(state, NoOpReason::StaleEvent),
            }
        }

        (StepKind::Survey { choices }, Event::SelectOption(index)) => {
            if *index < choices.len() {
                advance(doc, state, None)
            } else {
                ignore(state, NoOpReason::StaleEvent)
            }
        }
        (StepKind::Survey { choices }, Event::Choose(answer)) => {
            if choices.contains(answer) {
                advance(doc, state, None)
            } else {
                ignore(state, NoOpReason::StaleEvent)
            }
        }

        _ => ignore(state, NoOpReason::UnexpectedEvent),
    }
}

fn resolve_pending(
    state: &DialogueState,
    doc: &ScenarioDocument,
    pending: PendingTransition,
    event: &Event,
) -> Transition {
    debug_assert!(
        pending.next_step() <= doc.len(),
        "pending target {} beyond scenario '{}'",
        pending.next_step(),
        doc.id
    );

    match (pending, event) {
        (PendingTransition::AwaitingBranchContinue { next_step }, Event::Continue) => {
            debug!("[Branch] continue to step={}", next_step);
            render(doc, &state.at_step(next_step), None)
        }
        (PendingTransition::AwaitingBranchInput { next_step }, Event::TextInput(_)) => {
            debug!("[Branch] input received, moving to step={}", next_step);
            render(doc, &state.at_step(next_step), Some(Preface::AnswerReceived))
        }
        _ => ignore(state, NoOpReason::UnexpectedEvent),
    }
}

fn advance(doc: &ScenarioDocument, state: &DialogueState, preface: Option<Preface>) -> Transition {
    render(doc, &state.at_step(state.step_index + 1), preface)
}

fn ignore(state: &DialogueState, reason: NoOpReason) -> Transition {
    debug!("[Ignore] step={} reason={:?}", state.step_index, reason);
    Transition::keep(state, Outcome::NoOp(reason))
}

fn check_answer(
    doc: &ScenarioDocument,
    state: &DialogueState,
    correct_choice: &str,
    answer: &str,
) -> Transition {
    if answer == correct_choice {
        advance(doc, state, Some(Preface::CorrectAnswer))
    } else {
        debug!("[Practice] incorrect answer at step={}", state.step_index);
        Transition::keep(
            state,
            Outcome::Incorrect {
                step_index: state.step_index,
            },
        )
    }
}

fn select_branch(
    doc: &ScenarioDocument,
    state: &DialogueState,
    current: &Step,
    option: &BranchOption,
) -> Transition {
    let response = Some(Preface::Response(option.response.clone()));

    if option.repeat_step {
        debug!("[Branch] repeating step={}", state.step_index);
        let instruction = instruction_for(current, state.step_index).with_preface(response);
        return Transition::keep(state, Outcome::Render(instruction));
    }

    if option.show_continue_button {
        let next_step = state.step_index + 1;
        debug!("[Branch] awaiting continue, next step={}", next_step);
        let mut instruction = RenderInstruction::new(
            option.response.clone(),
            Affordance::Continue {
                label: current.button_label.clone(),
            },
        );
        instruction.step_index = Some(state.step_index);
        let pending = PendingTransition::AwaitingBranchContinue { next_step };
        return Transition {
            state: Some(state.with_pending(pending)),
            outcome: Outcome::Render(instruction),
        };
    }

    advance(doc, state, response)
}

fn request_input(state: &DialogueState, option: &InputOption) -> Transition {
    let next_step = state.step_index + 1;
    debug!("[Branch] awaiting input, next step={}", next_step);
    let mut instruction = RenderInstruction::new(
        option.input_prompt.clone(),
        Affordance::FreeText { placeholder: None },
    );
    instruction.step_index = Some(state.step_index);
    let pending = PendingTransition::AwaitingBranchInput { next_step };
    Transition {
        state: Some(state.with_pending(pending)),
        outcome: Outcome::Render(instruction),
    }
}

/// Build the render instruction for a step
pub fn instruction_for(step: &Step, index: usize) -> RenderInstruction {
    let affordance = match &step.kind {
        StepKind::Theory if step.is_final => Affordance::None,
        StepKind::Theory => Affordance::Advance {
            label: step.button_label.clone(),
        },
        StepKind::Practice { choices, .. } | StepKind::Survey { choices } => Affordance::Choices {
            choices: choices.clone(),
        },
        StepKind::TextAnswer { placeholder } => Affordance::FreeText {
            placeholder: placeholder.clone(),
        },
        StepKind::Branch { options } => Affordance::Options {
            labels: options.iter().map(|o| o.label.clone()).collect(),
        },
        StepKind::BranchWithInput { options } => Affordance::Options {
            labels: options.iter().map(|o| o.label.clone()).collect(),
        },
    };

    RenderInstruction {
        preface: None,
        text: step.text.clone(),
        photo: step.photo_ref.clone(),
        affordance,
        step_index: Some(index),
    }
}
