use std::borrow::Cow;

use crate::{ParseNodePointerError, PointerComponent};

pub(crate) struct SegmentParser<'a> {
    input: &'a [u8],
}

impl<'a> SegmentParser<'a> {
    #[inline]
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
        }
    }
}

impl<'a> Iterator for SegmentParser<'a> {
    type Item = Result<Cow<'a, str>, ParseNodePointerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.input.is_empty() {
            return None;
        }

        if self.input[0] != b'/' {
            return Some(Err(ParseNodePointerError::MissingSlash));
        }
        self.input = &self.input[1..];

        match memchr::memchr(b'/', self.input) {
            Some(idx) => {
                let segment = unescape_segment(&self.input[..idx]);
                self.input = &self.input[idx..];
                Some(Ok(segment))
            }
            None => {
                let segment = unescape_segment(self.input);
                self.input = &[];
                Some(Ok(segment))
            }
        }
    }
}

#[inline]
fn is_escape_char(ch: u8) -> bool {
    ch == b'0' || ch == b'1'
}

// Segments are split on ASCII bytes of a `&str`, so every slice is valid UTF-8.
fn unescape_segment(value: &[u8]) -> Cow<'_, str> {
    fn find_escape(value: &[u8]) -> Option<usize> {
        let mut p = 0;
        let len = value.len();

        while p < len {
            match memchr::memchr(b'~', &value[p..]) {
                Some(idx) if p + idx + 1 < len && is_escape_char(value[p + idx + 1]) => {
                    return Some(p + idx);
                }
                Some(idx) => p += idx + 1,
                None => return None,
            }
        }

        None
    }

    match find_escape(value) {
        Some(idx) => {
            let mut s = Vec::with_capacity(value.len());
            let mut i = idx;
            let len = value.len();

            s.extend_from_slice(&value[..idx]);
            while i < len {
                match value[i] {
                    b'~' if i + 1 < len && is_escape_char(value[i + 1]) => {
                        s.push(if value[i + 1] == b'0' { b'~' } else { b'/' });
                        i += 2;
                    }
                    ch => {
                        s.push(ch);
                        i += 1;
                    }
                }
            }

            String::from_utf8_lossy(&s).into_owned().into()
        }
        None => String::from_utf8_lossy(value),
    }
}

pub(crate) fn escape_segment(segment: &str) -> Cow<'_, str> {
    if memchr::memchr2(b'~', b'/', segment.as_bytes()).is_none() {
        return segment.into();
    }
    segment.replace('~', "~0").replace('/', "~1").into()
}

pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    segment.parse().ok()
}

pub(crate) fn parse_node_pointer<N, F>(
    input: &str,
    mut name_factory: F,
) -> Result<Vec<PointerComponent<N>>, ParseNodePointerError>
where
    F: FnMut(&str) -> Result<N, String>,
{
    let mut components = Vec::new();
    let mut appended = false;

    for res in SegmentParser::new(input) {
        let segment = res?;
        if appended {
            return Err(ParseNodePointerError::AppendNotLast);
        }

        let component = if segment == "-" {
            appended = true;
            PointerComponent::Append
        } else if let Some(index) = parse_index(&segment) {
            PointerComponent::Indexed(index)
        } else {
            let name =
                name_factory(&segment).map_err(|reason| ParseNodePointerError::InvalidName {
                    name: segment.to_string(),
                    reason,
                })?;
            PointerComponent::Named(name)
        };
        components.push(component);
    }

    Ok(components)
}
