use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

/// Formatting control tokens interleaved with text.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Control {
    /// Start of a nested block.
    Start,
    /// End of a nested block.
    End,
    /// End of line.
    Eol,
}

/// Unit of backend output.
#[derive(Debug, Clone, Hash, PartialEq, Eq, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Atom {
    Text(Cow<'static, str>),
    Control(Control),
}

impl Atom {
    pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
        Atom::Text(text.into())
    }
}

impl From<Control> for Atom {
    fn from(control: Control) -> Self {
        Atom::Control(control)
    }
}

impl From<&'static str> for Atom {
    fn from(text: &'static str) -> Self {
        Atom::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Atom {
    fn from(text: String) -> Self {
        Atom::Text(Cow::Owned(text))
    }
}

/// Lazy stream of atoms produced by a backend.
pub type Atoms<'a> = Box<dyn Iterator<Item = Atom> + 'a>;

/// Rendered output of a backend.
///
/// Wraps the lazy atom stream; nothing is produced until the output is
/// consumed through one of the methods below.
pub struct Output<'a> {
    atoms: Atoms<'a>,
}

impl<'a> Output<'a> {
    pub fn new(atoms: Atoms<'a>) -> Self {
        Self { atoms }
    }

    /// Raw atoms, control tokens included.
    pub fn atoms(self) -> Atoms<'a> {
        self.atoms
    }

    /// Text fragments with control tokens filtered out and end-of-line turned
    /// into `\n`.
    pub fn text(self) -> impl Iterator<Item = Cow<'static, str>> + 'a {
        self.atoms.filter_map(|atom| match atom {
            Atom::Text(text) => Some(text),
            Atom::Control(Control::Eol) => Some(Cow::Borrowed("\n")),
            Atom::Control(_) => None,
        })
    }

    pub fn write_to<W: std::fmt::Write>(self, writer: &mut W) -> std::fmt::Result {
        for fragment in self.text() {
            writer.write_str(&fragment)?;
        }
        Ok(())
    }

    pub fn write_io<W: std::io::Write>(self, writer: &mut W) -> std::io::Result<()> {
        for fragment in self.text() {
            writer.write_all(fragment.as_bytes())?;
        }
        Ok(())
    }

    pub fn into_string(self) -> String {
        self.text().collect()
    }
}

impl std::fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_are_filtered_except_eol() {
        let atoms: Vec<Atom> = vec![
            Control::Start.into(),
            "a".into(),
            Control::End.into(),
            Control::Eol.into(),
            String::from("b").into(),
        ];
        let output = Output::new(Box::new(atoms.into_iter()));
        assert_eq!(output.into_string(), "a\nb");
    }

    #[test]
    fn output_is_lazy() {
        let mut produced = 0;
        let atoms = std::iter::from_fn(|| {
            produced += 1;
            Some(Atom::text("x"))
        });
        let first: Vec<_> = Output::new(Box::new(atoms)).text().take(2).collect();
        assert_eq!(first, ["x", "x"]);
        assert_eq!(produced, 2);
    }
}
