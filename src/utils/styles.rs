//! Output styling. Colors and decorations come from ~/.elfnotes/styles.tcss which is
//! written out with defaults the first time elfnotes runs so that users can edit it.
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use termio::prelude::*;
use termio::{StyledString, Termio};

const DEFAULT_STYLES: &str = include_str!("default.tcss");

/// The styled bits of output. Each has an `@element` block in the styles file.
#[derive(Clone, Copy, Debug)]
pub enum Element {
    ExplainTitle,
    ExplainText,
    HexOffset,
    HexBytes,
    HexAscii,
    TableTitle,
    TableHeader,
    TableSeparator,
    TableField,
    Warning,
}

impl Element {
    fn name(self) -> &'static str {
        match self {
            Element::ExplainTitle => "explain title",
            Element::ExplainText => "explain text",
            Element::HexOffset => "hex offset",
            Element::HexBytes => "hex hex",
            Element::HexAscii => "hex ascii",
            Element::TableTitle => "table title",
            Element::TableHeader => "table header",
            Element::TableSeparator => "table separator",
            Element::TableField => "table field",
            Element::Warning => "warn",
        }
    }
}

pub trait Styling: Sized {
    fn styled(self, element: Element) -> StyledString;

    fn explain_title(self) -> StyledString {
        self.styled(Element::ExplainTitle)
    }

    fn explain_text(self) -> StyledString {
        self.styled(Element::ExplainText)
    }

    fn hex_offset(self) -> StyledString {
        self.styled(Element::HexOffset)
    }

    fn hex_hex(self) -> StyledString {
        self.styled(Element::HexBytes)
    }

    fn hex_ascii(self) -> StyledString {
        self.styled(Element::HexAscii)
    }

    fn table_title(self) -> StyledString {
        self.styled(Element::TableTitle)
    }

    fn table_header(self) -> StyledString {
        self.styled(Element::TableHeader)
    }

    fn table_sep(self) -> StyledString {
        self.styled(Element::TableSeparator)
    }

    fn table_field(self) -> StyledString {
        self.styled(Element::TableField)
    }

    fn warn(self) -> StyledString {
        self.styled(Element::Warning)
    }
}

impl Styling for String {
    fn styled(self, element: Element) -> StyledString {
        self.style(element.name(), &TCSS)
    }
}

impl Styling for &str {
    fn styled(self, element: Element) -> StyledString {
        self.style(element.name(), &TCSS)
    }
}

fn styles_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".elfnotes").join("styles.tcss"))
}

// Output is unstyled if the file is missing or bad. Note that warn() can't be used
// here because it needs TCSS.
static TCSS: LazyLock<Termio> = LazyLock::new(|| {
    let Some(path) = styles_path().filter(|p| p.exists()) else {
        return Termio::new();
    };
    let path = path.to_string_lossy().into_owned();
    Termio::from_file(&path).unwrap_or_else(|err| {
        eprintln!("couldn't parse {path}: {err}");
        Termio::new()
    })
});

/// Writes the default styles file unless the user already has one.
pub fn generate_style_file() {
    let Some(path) = styles_path() else {
        eprintln!("couldn't find a home directory, output won't be styled");
        return;
    };
    if let Err(err) = write_defaults(&path) {
        eprintln!("couldn't create {}: {err}", path.display());
    }
}

fn write_defaults(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => file.write_all(DEFAULT_STYLES.as_bytes()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(err) => Err(err),
    }
}
