//! Line-by-line document streaming
//!
//! Lines are handed out with their original terminator so that copying a
//! document through an accept-everything filter reproduces it byte for byte.

use singlehead_core::Result;
use std::io::{BufRead, Write};

/// Call `f` with every line of `reader` (1-based number, line with terminator)
pub fn for_each_line<R, F>(mut reader: R, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(usize, &str) -> Result<()>,
{
    let mut buf = String::new();
    let mut number = 0;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        number += 1;
        f(number, &buf)?;
    }
    Ok(())
}

/// Copy the lines of `reader` that `keep` returns to `out`
pub fn copy_filtered<R, W, F>(reader: R, out: &mut W, mut keep: F) -> Result<()>
where
    R: BufRead,
    W: Write + ?Sized,
    F: for<'l> FnMut(&'l str) -> Option<&'l str>,
{
    for_each_line(reader, |_, line| {
        if let Some(kept) = keep(line) {
            out.write_all(kept.as_bytes())?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lines_keep_terminators() {
        let mut seen = Vec::new();
        for_each_line(Cursor::new("a\r\nb\nc"), |n, line| {
            seen.push((n, line.to_string()));
            Ok(())
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![
                (1, "a\r\n".to_string()),
                (2, "b\n".to_string()),
                (3, "c".to_string())
            ]
        );
    }

    #[test]
    fn test_copy_everything_is_identity() {
        let input = "int a;\n\nint b;";
        let mut out = Vec::new();
        copy_filtered(Cursor::new(input), &mut out, |line| Some(line)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), input);
    }

    #[test]
    fn test_copy_with_predicate() {
        let mut out = Vec::new();
        copy_filtered(Cursor::new("keep\ndrop\nkeep too\n"), &mut out, |line| {
            (!line.starts_with("drop")).then_some(line)
        })
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "keep\nkeep too\n");
    }
}
