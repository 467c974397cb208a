//! Filename sanitization.

/// Characters rejected by common filesystems (NTFS is the strictest).
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace characters illegal in filenames with `_`.
///
/// Applied to every stem before an output path is constructed, so the
/// write is guaranteed to succeed on the target filesystem.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_illegal_characters() {
        assert_eq!(sanitize_filename("ch:01"), "ch_01");
        assert_eq!(sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn leaves_clean_names_untouched() {
        assert_eq!(sanitize_filename("0005"), "0005");
        assert_eq!(sanitize_filename("第一章 风起"), "第一章 风起");
    }
}
