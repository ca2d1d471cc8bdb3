//! Typed commands read from the terminal.
//!
//! Each line is one command. Most commands become one or two coordinator
//! [`Event`]s; a few (`credits`, `close`, `help`, `quit`) are handled by the
//! host directly. Answer and option numbers are 1-based on the terminal.

use greentrack_core::Event;
use greentrack_types::SwipeDirection;

use crate::error::CommandError;

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  swipe left|right     swipe the card fully to one side
  swipe <distance>     drag by <distance> points and let go
  drag <distance>      drag without letting go (shows the preview)
  start                start the quiz
  answer <n>           pick answer n
  next                 next question
  choose <n>           pick design option n
  restart              start over after the game
  say <text>           send a chat message
  input <text>         type into the chat box without sending
  send                 send the chat box
  year <yyyy>          move the timeline slider
  benefit <id>         expand or collapse a benefit
  footprint <kwh>      estimate yearly CO2 for <kwh>
  back                 return to the start
  credits | close      show or hide the sources
  help | quit";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Swipe fully to a side.
    Swipe(SwipeDirection),
    /// Drag by a distance and release.
    Gesture(f64),
    /// Drag by a distance without releasing.
    Drag(f64),
    /// Leave the quiz welcome screen.
    Start,
    /// Pick a quiz answer (0-based).
    Answer(usize),
    /// Next quiz question.
    Next,
    /// Pick a design option (0-based).
    Choose(usize),
    /// Start over after the game.
    Restart,
    /// Send a chat message.
    Say(String),
    /// Replace the chat input buffer.
    Input(String),
    /// Send the chat input buffer.
    Send,
    /// Move the timeline slider.
    Year(i32),
    /// Toggle a benefit.
    Benefit(u32),
    /// Run the footprint calculator.
    Footprint(String),
    /// Back to the start.
    Back,
    /// Show the credits overlay.
    Credits,
    /// Hide the credits overlay.
    Close,
    /// Print the command list.
    Help,
    /// Exit.
    Quit,
}

impl Command {
    /// The coordinator events this command stands for. Empty for commands
    /// the host handles itself.
    pub fn into_events(self) -> Vec<Event> {
        match self {
            Self::Swipe(direction) => vec![Event::Swipe(direction)],
            Self::Gesture(distance) => vec![Event::Drag(distance), Event::Release(distance)],
            Self::Drag(distance) => vec![Event::Drag(distance)],
            Self::Start => vec![Event::StartQuiz],
            Self::Answer(option) => vec![Event::Answer(option)],
            Self::Next => vec![Event::NextQuestion],
            Self::Choose(option) => vec![Event::ChooseOption(option)],
            Self::Restart => vec![Event::RestartGame],
            Self::Say(text) => vec![Event::Say(text)],
            Self::Input(text) => vec![Event::SetInput(text)],
            Self::Send => vec![Event::SubmitInput],
            Self::Year(year) => vec![Event::SelectYear(year)],
            Self::Benefit(id) => vec![Event::ToggleBenefit(id)],
            Self::Footprint(kwh) => vec![Event::CalculateFootprint(kwh)],
            Self::Back => vec![Event::Back],
            Self::Credits | Self::Close | Self::Help | Self::Quit => Vec::new(),
        }
    }
}

/// Parse one line of input. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));
    if word.is_empty() {
        return Ok(None);
    }

    let command = match word.to_ascii_lowercase().as_str() {
        "swipe" => parse_swipe(rest)?,
        "drag" => Command::Drag(number(rest, "drag", "a distance in points")?),
        "start" => Command::Start,
        "answer" => Command::Answer(ordinal(rest, "answer")?),
        "next" => Command::Next,
        "choose" => Command::Choose(ordinal(rest, "choose")?),
        "restart" => Command::Restart,
        "say" => Command::Say(rest.to_owned()),
        "input" => Command::Input(rest.to_owned()),
        "send" => Command::Send,
        "year" => Command::Year(number(rest, "year", "a year such as 2022")?),
        "benefit" => Command::Benefit(number(rest, "benefit", "a benefit id")?),
        "footprint" => Command::Footprint(required(rest, "footprint", "a number of kWh")?.to_owned()),
        "back" => Command::Back,
        "credits" => Command::Credits,
        "close" => Command::Close,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => {
            return Err(CommandError::Unknown {
                word: word.to_owned(),
            });
        }
    };
    Ok(Some(command))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(
    rest: &str,
    command: &'static str,
    expected: &'static str,
) -> Result<T, CommandError> {
    required(rest, command, expected)?
        .parse()
        .map_err(|_| CommandError::InvalidArgument {
            command,
            value: rest.to_owned(),
            expected,
        })
}

/// A 1-based number on the terminal, returned 0-based.
fn ordinal(rest: &str, command: &'static str) -> Result<usize, CommandError> {
    const EXPECTED: &str = "a number starting at 1";
    let n: usize = number(rest, command, EXPECTED)?;
    n.checked_sub(1).ok_or_else(|| CommandError::InvalidArgument {
        command,
        value: rest.to_owned(),
        expected: EXPECTED,
    })
}

fn parse_swipe(rest: &str) -> Result<Command, CommandError> {
    const EXPECTED: &str = "left, right, or a distance";
    match required(rest, "swipe", EXPECTED)?.to_ascii_lowercase().as_str() {
        "left" | "l" => Ok(Command::Swipe(SwipeDirection::Left)),
        "right" | "r" => Ok(Command::Swipe(SwipeDirection::Right)),
        _ => number(rest, "swipe", EXPECTED).map(Command::Gesture),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn swipe_accepts_direction_or_distance() {
        assert_eq!(
            parse("swipe Left"),
            Ok(Some(Command::Swipe(SwipeDirection::Left)))
        );
        assert_eq!(parse("swipe 120"), Ok(Some(Command::Gesture(120.0))));
        assert_eq!(parse("swipe -80.5"), Ok(Some(Command::Gesture(-80.5))));
        assert!(matches!(
            parse("swipe up"),
            Err(CommandError::InvalidArgument { command: "swipe", .. })
        ));
    }

    #[test]
    fn gesture_expands_to_drag_then_release() {
        let events = Command::Gesture(120.0).into_events();
        assert_eq!(events, vec![Event::Drag(120.0), Event::Release(120.0)]);
    }

    #[test]
    fn answers_are_one_based() {
        assert_eq!(parse("answer 3"), Ok(Some(Command::Answer(2))));
        assert_eq!(parse("choose 1"), Ok(Some(Command::Choose(0))));
        assert!(matches!(
            parse("answer 0"),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse("answer"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn say_keeps_the_rest_of_the_line() {
        assert_eq!(
            parse("say  how do I   save energy? "),
            Ok(Some(Command::Say("how do I   save energy?".to_owned())))
        );
        assert_eq!(parse("say"), Ok(Some(Command::Say(String::new()))));
    }

    #[test]
    fn footprint_passes_raw_input_through() {
        assert_eq!(
            parse("footprint 12,000"),
            Ok(Some(Command::Footprint("12,000".to_owned())))
        );
    }

    #[test]
    fn host_commands_have_no_events() {
        assert!(Command::Credits.into_events().is_empty());
        assert!(Command::Quit.into_events().is_empty());
        assert_eq!(parse("EXIT"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn unknown_word_is_reported() {
        assert_eq!(
            parse("dance now"),
            Err(CommandError::Unknown {
                word: "dance".to_owned()
            })
        );
    }
}
