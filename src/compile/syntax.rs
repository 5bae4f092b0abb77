use morel::{Finder, Syntax};

/// Delimiters that identify tags within template source.
///
/// Delimiters are fixed, there is no runtime delimiter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `{{`
    Begin = 0,
    /// `}}`
    End = 1,
    /// `{{{`
    BeginRaw = 2,
    /// `}}}`
    EndRaw = 3,
}

impl From<usize> for Marker {
    fn from(value: usize) -> Self {
        match value {
            0 => Self::Begin,
            1 => Self::End,
            2 => Self::BeginRaw,
            3 => Self::EndRaw,
            _ => unreachable!(),
        }
    }
}

/// Build a [`Syntax`] containing every recognized [`Marker`].
pub fn to_syntax() -> Syntax {
    Syntax::new(vec![
        (Marker::Begin as usize, "{{".to_string()),
        (Marker::End as usize, "}}".to_string()),
        (Marker::BeginRaw as usize, "{{{".to_string()),
        (Marker::EndRaw as usize, "}}}".to_string()),
    ])
}

/// Build a [`Finder`] over the delimiter [`Syntax`].
pub fn to_finder<T: AsRef<[u8]>>() -> Finder<T> {
    Finder::new(to_syntax())
}
