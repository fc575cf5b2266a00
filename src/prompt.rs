use std::io::{self, IsTerminal as _};
use std::sync::OnceLock;

use dialoguer::theme::SimpleTheme;
use dialoguer::Input;

use lamgen::choice::{LinePrompter, Prompter, Question};
use lamgen::Error;

static THEME: OnceLock<SimpleTheme> = OnceLock::new();

/// Prompts on an interactive terminal through dialoguer.
pub(crate) struct Terminal;

impl Prompter for Terminal {
    fn read_line(&mut self, question: &Question) -> lamgen::Result<String> {
        let theme = THEME.get_or_init(|| SimpleTheme);
        print!("{}", question.listing());
        Input::<String>::with_theme(theme)
            .with_prompt(question.request())
            .allow_empty(true)
            .interact_text()
            .map_err(|err| Error::Prompt(err.to_string()))
    }

    fn reject(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Terminal prompts when a person is typing, plain lines when stdin is piped.
pub(crate) fn prompter() -> Box<dyn Prompter> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        Box::new(Terminal)
    } else {
        Box::new(LinePrompter::new(stdin.lock(), io::stdout()))
    }
}
