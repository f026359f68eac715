//! Display Module
//!
//! Read-only snapshots of the cache and a pretty-printer that renders them as
//! a map literal, e.g. `{0: 'value #0', 1: 'value #1'}`.

use std::borrow::Borrow;
use std::fmt::{self, Write};

// == Repr ==
/// Literal-style rendering of a key or value.
///
/// Strings are single-quoted, everything else is written plainly.
pub trait Repr {
    fn repr(&self, out: &mut dyn Write) -> fmt::Result;

    /// Renders into a fresh String.
    fn to_repr(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.repr(&mut out);
        out
    }
}

impl Repr for str {
    fn repr(&self, out: &mut dyn Write) -> fmt::Result {
        out.write_char('\'')?;
        for c in self.chars() {
            match c {
                '\'' => out.write_str("\\'")?,
                '\\' => out.write_str("\\\\")?,
                '\n' => out.write_str("\\n")?,
                '\t' => out.write_str("\\t")?,
                c => out.write_char(c)?,
            }
        }
        out.write_char('\'')
    }
}

impl Repr for String {
    fn repr(&self, out: &mut dyn Write) -> fmt::Result {
        self.as_str().repr(out)
    }
}

impl Repr for char {
    fn repr(&self, out: &mut dyn Write) -> fmt::Result {
        let mut buf = [0u8; 4];
        (*self.encode_utf8(&mut buf)).repr(out)
    }
}

macro_rules! plain_repr {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Repr for $ty {
                fn repr(&self, out: &mut dyn Write) -> fmt::Result {
                    write!(out, "{}", self)
                }
            }
        )*
    };
}

plain_repr!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool);

impl<T: Repr + ?Sized> Repr for &T {
    fn repr(&self, out: &mut dyn Write) -> fmt::Result {
        (**self).repr(out)
    }
}

impl<T: Repr> Repr for [T] {
    fn repr(&self, out: &mut dyn Write) -> fmt::Result {
        out.write_char('[')?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            item.repr(out)?;
        }
        out.write_char(']')
    }
}

impl<T: Repr> Repr for Vec<T> {
    fn repr(&self, out: &mut dyn Write) -> fmt::Result {
        self.as_slice().repr(out)
    }
}

impl<T: Repr> Repr for Option<T> {
    fn repr(&self, out: &mut dyn Write) -> fmt::Result {
        match self {
            Some(value) => value.repr(out),
            None => out.write_str("None"),
        }
    }
}

// == Snapshot ==
/// Borrowed, ordered view of a cache's resident entries.
#[derive(Debug, Clone)]
pub struct Snapshot<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
}

impl<'a, K, V> Snapshot<'a, K, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a K, &'a V)> + '_ {
        self.entries.iter().copied()
    }

    /// Looks up a key by linear scan.
    pub fn get<Q>(&self, key: &Q) -> Option<&'a V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries
            .iter()
            .find(|entry| <K as Borrow<Q>>::borrow(entry.0) == key)
            .map(|entry| entry.1)
    }
}

impl<'a, K, V> FromIterator<(&'a K, &'a V)> for Snapshot<'a, K, V> {
    fn from_iter<I: IntoIterator<Item = (&'a K, &'a V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// == Pretty Printer ==
/// Renders snapshots, breaking one entry per line when the single-line form
/// is wider than `width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyPrinter {
    pub width: usize,
}

impl PrettyPrinter {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn render<K: Repr, V: Repr>(&self, snapshot: &Snapshot<'_, K, V>) -> String {
        let items: Vec<String> = snapshot
            .iter()
            .map(|(key, value)| format!("{}: {}", key.to_repr(), value.to_repr()))
            .collect();

        let single_line = format!("{{{}}}", items.join(", "));
        if items.len() <= 1 || single_line.chars().count() <= self.width {
            return single_line;
        }
        format!("{{{}}}", items.join(",\n "))
    }
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new(80)
    }
}
