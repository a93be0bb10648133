use crate::{Error, Result};

/// A parsed column annotation.
///
/// The grammar is `<column-name> <column-type> [option,option,...]`. Options
/// may be wrapped in square brackets, which may also be attached directly to
/// the column type (`varchar(64)[pk]`). The legacy `name|type|options` form is
/// accepted as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Column name in the table
    pub column: String,

    /// Column type, used verbatim in DDL
    pub column_type: String,

    pub options: Options,
}

/// Column options. Unknown options are ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// `pk`
    pub primary_key: bool,

    /// `uk`
    pub unique: bool,

    /// `index`
    pub index: bool,

    /// `nil`: the column accepts `NULL`
    pub nullable: bool,

    /// `protected`: never mass-assigned and never serialized
    pub protected: bool,
}

impl Annotation {
    pub fn parse(src: &str) -> Result<Annotation> {
        let (head, bracketed) = split_brackets(src);

        let tokens = if head.contains('|') {
            head.split('|')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect::<Vec<_>>()
        } else {
            tokenize(head)
        };

        let mut tokens = tokens.into_iter();

        let Some(column) = tokens.next() else {
            return Err(Error::invalid_annotation(src, "missing column name"));
        };

        let Some(column_type) = tokens.next() else {
            return Err(Error::invalid_annotation(src, "missing column type"));
        };

        let mut options = Options::default();

        for option in tokens
            .chain(bracketed)
            .flat_map(|token| token.split(','))
            .map(str::trim)
        {
            options.apply(option);
        }

        Ok(Annotation {
            column: column.to_string(),
            column_type: column_type.to_string(),
            options,
        })
    }
}

impl Options {
    fn apply(&mut self, option: &str) {
        match option {
            "pk" => self.primary_key = true,
            "uk" => self.unique = true,
            "index" => self.index = true,
            "nil" => self.nullable = true,
            "protected" => self.protected = true,
            _ => {}
        }
    }
}

/// Splits `src` into the part before the first `[` and the contents of the
/// bracket group, if any.
fn split_brackets(src: &str) -> (&str, Option<&str>) {
    let Some(start) = src.find('[') else {
        return (src, None);
    };

    let rest = &src[start + 1..];
    let end = rest.find(']').unwrap_or(rest.len());
    (&src[..start], Some(&rest[..end]))
}

/// Splits on whitespace, keeping parenthesized groups such as
/// `decimal(10, 2)` in one token.
fn tokenize(src: &str) -> Vec<&str> {
    let mut tokens = vec![];
    let mut depth = 0usize;
    let mut start = None;

    for (i, ch) in src.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }

        if ch.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                tokens.push(&src[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if let Some(s) = start {
        tokens.push(&src[s..]);
    }

    tokens
}
