mod commands;
mod elf;
mod repl;
mod utils;
use clap::Parser;
use clap_repl::ClapEditor;
use clap_repl::reedline::{
    DefaultPrompt, FileBackedHistory, Highlighter, Prompt, PromptEditMode, PromptHistorySearch,
    StyledText,
};
use elf::ElfFile;
use nu_ansi_term::{Color, Style};
use repl::{ElfAction, InfoAction, Repl};
use std::borrow::Cow;
use std::path::PathBuf;
use std::process;
use utils::warn;

const HISTORY_PATH: &str = "/tmp/elfnotes-history";
const HISTORY_SIZE: usize = 10000;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// path to an exe, shared object, or core file
    file: PathBuf,
}

/// Colors what the user types.
pub struct CommandHighlighter {
    color: Color,
}

impl Highlighter for CommandHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled_text = StyledText::new();
        styled_text.push((Style::new().fg(self.color), line.to_string()));
        styled_text
    }
}

impl CommandHighlighter {
    pub fn new() -> CommandHighlighter {
        CommandHighlighter { color: Color::Blue }
    }
}

pub struct NotesPrompt {
    color: clap_repl::reedline::Color,
    default: DefaultPrompt,
}

impl Prompt for NotesPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed("elfnotes")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        self.default.render_prompt_multiline_indicator()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        self.default
            .render_prompt_history_search_indicator(history_search)
    }

    // the text that appears in the prompt
    fn get_prompt_color(&self) -> clap_repl::reedline::Color {
        self.color
    }
}

impl NotesPrompt {
    fn new() -> NotesPrompt {
        NotesPrompt {
            color: clap_repl::reedline::Color::DarkBlue,
            default: DefaultPrompt::default(),
        }
    }
}

fn load_file(path: PathBuf) -> ElfFile {
    match ElfFile::new(path.clone()) {
        Ok(file) => file,
        Err(e) => {
            warn(&format!("Couldn't load {}: {e}", path.display()));
            process::exit(1);
        }
    }
}

fn main() {
    utils::generate_style_file();

    let cli = Cli::parse();
    let file = load_file(cli.file);

    let rl = ClapEditor::<Repl>::builder()
        .with_prompt(Box::new(NotesPrompt::new()))
        .with_editor_hook(|reed| {
            let reed = reed.with_highlighter(Box::new(CommandHighlighter::new()));
            match FileBackedHistory::with_file(HISTORY_SIZE, HISTORY_PATH.into()) {
                Ok(history) => reed.with_history(Box::new(history)),
                Err(err) => {
                    warn(&format!("Couldn't open history at {HISTORY_PATH}: {err}"));
                    reed
                }
            }
        })
        .build();

    use repl::MainCommand::*;
    rl.repl(|repl: Repl| {
        let mut out = std::io::stdout();
        match repl.command {
            Elf(elf) => match elf.action {
                ElfAction::Header(args) => commands::elf_header(&mut out, &file, &args),
                ElfAction::Notes(args) => commands::elf_notes(&mut out, &file, &args),
                ElfAction::Sections(args) => commands::elf_sections(&mut out, &file, &args),
                ElfAction::Segments(args) => commands::elf_segments(&mut out, &file, &args),
            },
            Info(info) => match info.action {
                InfoAction::Abi(args) => commands::info_abi(&mut out, &file, &args),
                InfoAction::BuildId => commands::info_build_id(&mut out, &file),
                InfoAction::Locate(args) => commands::info_locate(&mut out, &file, &args),
            },
            Hexdump(args) => commands::hexdump(&mut out, &file, &args),
            Quit => process::exit(0),
        }
    });
}
