//! Terminal player for scenarios
//!
//! A minimal transport: renders instructions to stdout and turns typed lines
//! into events for the engine.

use crate::{
    application::DialogueEngine,
    config::EngineConfig,
    domain::value_objects::{ScenarioId, UserId},
    transport,
    types::{Affordance, Event, NoOpReason, Outcome, Preface, RenderInstruction},
};
use std::io::{self, Write};

/// The terminal always plays as a single local user
const LOCAL_USER: i64 = 0;

/// Run the player mode until the scenario completes or the user quits
pub async fn run_play(
    engine: &DialogueEngine,
    config: &EngineConfig,
    scenario: &ScenarioId,
    debug: bool,
) -> anyhow::Result<()> {
    let user = UserId::new(LOCAL_USER);

    println!("=== stepwise Scenario Player ===");
    println!();
    println!("Controls:");
    println!("  Enter: next / continue");
    println!("  1-9:   select choice");
    println!("  q:     quit");
    println!();

    let mut outcome = match engine.start_scenario(user, scenario).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_not_found() => {
            println!("❌ Scenario not found: {scenario}");
            return Ok(());
        }
        Err(e) if e.is_unavailable() => {
            println!("❌ Scenario unavailable: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let mut current: Option<RenderInstruction> = None;

    loop {
        match outcome {
            Outcome::Render(instruction) => {
                show_instruction(&instruction, config);
                current = Some(instruction);
            }
            Outcome::Incorrect { .. } => println!("❌ Incorrect, try again"),
            Outcome::NoOp(reason) => show_noop(reason),
            Outcome::Complete { preface } => {
                show_preface(preface.as_ref());
                println!("🎉 Scenario complete!");
                return Ok(());
            }
        }

        if debug {
            let state = engine.current_state(user).await?;
            println!("[debug] state={}", serde_json::to_string(&state)?);
        }

        let Some(instruction) = current.as_ref() else {
            return Ok(());
        };

        let event = loop {
            let input = get_input(prompt_for(&instruction.affordance))?;
            if input == "q" {
                println!("Goodbye!");
                engine.cancel(user).await?;
                return Ok(());
            }
            match parse_input(&input, instruction) {
                Some(event) => break event,
                None => println!("Invalid input. Enter a listed number, text, or 'q'."),
            }
        };

        outcome = engine.handle_event(user, event).await?;
    }
}

/// Translate a typed line into an event for the instruction on screen
pub fn parse_input(input: &str, instruction: &RenderInstruction) -> Option<Event> {
    let input = input.trim();
    let number = input.parse::<usize>().ok().filter(|n| *n > 0);

    let event = match &instruction.affordance {
        Affordance::None | Affordance::Advance { .. } if input.is_empty() => Some(Event::Advance),
        Affordance::Continue { .. } if input.is_empty() => Some(Event::Continue),
        Affordance::Choices { choices } => choices
            .iter()
            .find(|choice| choice.as_str() == input)
            .or_else(|| number.and_then(|n| choices.get(n - 1)))
            .cloned()
            .map(Event::Choose),
        Affordance::Options { labels } => number
            .filter(|n| *n <= labels.len())
            .map(|n| Event::SelectOption(n - 1)),
        Affordance::FreeText { .. } if !input.is_empty() => {
            return Some(Event::TextInput(input.to_string()));
        }
        _ => None,
    };

    event.or_else(|| transport::decode(input))
}

fn prompt_for(affordance: &Affordance) -> &'static str {
    match affordance {
        Affordance::Choices { .. } | Affordance::Options { .. } => "Select:",
        Affordance::FreeText { .. } => "Your answer:",
        _ => "",
    }
}

fn show_preface(preface: Option<&Preface>) {
    match preface {
        Some(Preface::Response(text)) => {
            println!("{text}");
            println!();
        }
        Some(Preface::CorrectAnswer) => println!("✅ Correct!"),
        Some(Preface::AnswerReceived) => println!("✅ Thanks for your answer!"),
        None => {}
    }
}

fn show_instruction(instruction: &RenderInstruction, config: &EngineConfig) {
    show_preface(instruction.preface.as_ref());

    if let Some(photo) = &instruction.photo {
        let path = config.resolve_photo(photo);
        if path.exists() {
            println!("[photo: {}]", path.display());
        } else {
            println!("[photo missing: {}]", path.display());
        }
    }

    println!("{}", instruction.text);
    match &instruction.affordance {
        Affordance::None => {}
        Affordance::Advance { label } => {
            println!("[{}]", label.as_deref().unwrap_or("next →"));
        }
        Affordance::Continue { label } => {
            println!("[{}]", label.as_deref().unwrap_or("continue →"));
        }
        Affordance::Choices { choices } => show_numbered(choices),
        Affordance::Options { labels } => show_numbered(labels),
        Affordance::FreeText { placeholder } => {
            if let Some(hint) = placeholder {
                println!("💡 Hint: {hint}");
            }
        }
    }
    println!();
}

fn show_numbered(items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        println!("{}. {}", i + 1, item);
    }
}

fn show_noop(reason: NoOpReason) {
    match reason {
        NoOpReason::NoActiveScenario => println!("No scenario is running."),
        NoOpReason::StaleEvent | NoOpReason::UnexpectedEvent => println!("⚠️ Try again"),
    }
}

/// Get user input with an optional prompt
fn get_input(prompt: &str) -> io::Result<String> {
    if !prompt.is_empty() {
        print!("{} ", prompt);
        io::stdout().flush()?;
    }

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction(affordance: Affordance) -> RenderInstruction {
        RenderInstruction::new("text", affordance)
    }

    #[test]
    fn enter_advances_or_continues() {
        let advance = instruction(Affordance::Advance { label: None });
        assert_eq!(parse_input("", &advance), Some(Event::Advance));

        let cont = instruction(Affordance::Continue { label: None });
        assert_eq!(parse_input("", &cont), Some(Event::Continue));
    }

    #[test]
    fn numbers_pick_choices_and_options() {
        let choices = instruction(Affordance::Choices {
            choices: vec!["a".to_string(), "b".to_string()],
        });
        assert_eq!(parse_input("2", &choices), Some(Event::Choose("b".to_string())));
        assert_eq!(parse_input("a", &choices), Some(Event::Choose("a".to_string())));
        assert_eq!(parse_input("3", &choices), None);

        let numeric = instruction(Affordance::Choices {
            choices: vec!["10".to_string(), "20".to_string()],
        });
        assert_eq!(parse_input("20", &numeric), Some(Event::Choose("20".to_string())));
        assert_eq!(parse_input("1", &numeric), Some(Event::Choose("10".to_string())));

        let options = instruction(Affordance::Options {
            labels: vec!["x".to_string()],
        });
        assert_eq!(parse_input("1", &options), Some(Event::SelectOption(0)));
        assert_eq!(parse_input("0", &options), None);
        assert_eq!(parse_input("opt_0", &options), Some(Event::SelectOption(0)));
    }

    #[test]
    fn free_text_takes_the_whole_line() {
        let text = instruction(Affordance::FreeText { placeholder: None });
        assert_eq!(
            parse_input("my answer", &text),
            Some(Event::TextInput("my answer".to_string()))
        );
        assert_eq!(parse_input("", &text), None);
    }
}
