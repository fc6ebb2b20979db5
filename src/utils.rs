use std::fmt;

pub fn write_byte_string(f: &mut fmt::Formatter<'_>, byte_string: &[u8]) -> fmt::Result {
    write!(f, "\"")?;
    for b in byte_string {
        match *b {
            32..=33 | 35..=126 => write!(f, "{}", *b as char)?,
            34 => write!(f, "\\\"")?,
            _ => write!(f, "{:#02X}", b)?,
        }
    }
    write!(f, "\"")?;
    Ok(())
}

/// A function to check whether the byte is a whitespace (blank, new line, carriage return or tab)
#[inline]
pub(crate) const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\r' | b'\n' | b'\t' | b'\x0C')
}

/// Checks whether a byte may start an element name.
///
/// Any non-ASCII byte is accepted, so names in any script pass through.
#[inline]
pub(crate) const fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80
}

/// Compares two markup names, ignoring ASCII case unless `case_sensitive`.
#[inline]
pub(crate) fn names_equal(a: &[u8], b: &[u8], case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.eq_ignore_ascii_case(b)
    }
}

/// Returns the length of the leading whitespace of `bytes`.
#[inline]
pub(crate) fn whitespace_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|&b| !is_whitespace(b))
        .unwrap_or(bytes.len())
}

/// Lossy conversion used when a name has to be put into an error.
#[inline]
pub(crate) fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
