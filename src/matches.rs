//! Byte class lookup tables.
macro_rules! byte_map {
    // ===== 256 lookup table =====
    {
        $(#[$meta:meta])*
        $vis:vis const fn $fn_id:ident($byte:ident:$u8:ty) { $e:expr }
    } => {
        $(#[$meta])*
        $vis const fn $fn_id($byte: $u8) -> bool {
            static PAT: [bool; 256] = {
                let mut bytes = [false; 256];
                let mut $byte = 0u8;
                const fn filter($byte: $u8) -> bool {
                    $e
                }
                loop {
                    bytes[$byte as usize] = filter($byte);
                    if $byte == 255 {
                        break;
                    }
                    $byte += 1;
                }
                bytes
            };
            // SAFETY: the pattern size is equal to u8::MAX
            unsafe { *PAT.as_ptr().add($byte as usize) }
        }
    };
}

// ===== Blocks =====

byte_map! {
    /// unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"
    #[inline(always)]
    pub const fn unreserved(byte: u8) {
        byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'.' | b'_' | b'~')
    }
}

byte_map! {
    /// sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
    ///            / "*" / "+" / "," / ";" / "="
    #[inline(always)]
    pub const fn sub_delims(byte: u8) {
        matches!(
            byte,
            b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
        )
    }
}

// ===== URI =====

byte_map! {
    /// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
    #[inline(always)]
    pub const fn is_scheme(byte: u8) {
        byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.')
    }
}

byte_map! {
    /// Bytes left as is in a path, `pct-encoded` is checked separately.
    ///
    /// path = *( pchar / "/" )
    #[inline(always)]
    pub const fn is_path(byte: u8) {
        unreserved(byte)
        || sub_delims(byte)
        || matches!(byte, b'%' | b':' | b'@' | b'/')
    }
}

byte_map! {
    /// query    = *( pchar / "/" / "?" )
    /// fragment = *( pchar / "/" / "?" )
    #[inline(always)]
    pub const fn is_query(byte: u8) {
        is_path(byte) || byte == b'?'
    }
}

byte_map! {
    /// userinfo = *( unreserved / pct-encoded / sub-delims / ":" )
    #[inline(always)]
    pub const fn is_userinfo(byte: u8) {
        unreserved(byte) || sub_delims(byte) || matches!(byte, b'%' | b':')
    }
}

byte_map! {
    /// The user part of userinfo, where `:` is the password delimiter.
    #[inline(always)]
    pub const fn is_user(byte: u8) {
        unreserved(byte) || sub_delims(byte) || byte == b'%'
    }
}

byte_map! {
    /// label = ALPHA / DIGIT / "-"
    #[inline(always)]
    pub const fn is_label(byte: u8) {
        byte.is_ascii_alphanumeric() || byte == b'-'
    }
}

// ===== HTTP =====

byte_map! {
    /// token   = 1*tchar
    /// tchar   = "!" / "#" / "$" / "%" / "&" / "'" / "*"
    ///         / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
    ///         / DIGIT / ALPHA
    #[inline(always)]
    pub const fn is_token(byte: u8) {
        matches!(
            byte,
            | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
            | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        )
        || byte.is_ascii_alphanumeric()
    }
}

byte_map! {
    /// field-content = field-vchar [ 1*( SP / HTAB ) field-vchar ]
    /// field-vchar   = VCHAR
    ///
    /// `obs-text` is not allowed.
    #[inline(always)]
    pub const fn is_header_value(byte: u8) {
        matches!(byte, b' ' | b'\t' | 0x21..=0x7e)
    }
}

byte_map! {
    /// cookie-name = token, minus `"` `,` `;` and `\`
    #[inline(always)]
    pub const fn is_cookie_name(byte: u8) {
        matches!(byte, 0x21 | 0x23..=0x2b | 0x2d..=0x3a | 0x3c..=0x5b | 0x5d..=0x7e)
    }
}

/// FNV-1a hash of the lowercased bytes.
pub const fn hash_to_lowercase(bytes: &[u8]) -> u64 {
    const INITIAL_STATE: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    let mut hash = INITIAL_STATE;
    let mut i = 0;

    while i < bytes.len() {
        hash ^= bytes[i].to_ascii_lowercase() as u64;
        hash = hash.wrapping_mul(PRIME);
        i += 1;
    }

    hash
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classes() {
        assert!(is_path(b'/'));
        assert!(!is_path(b'?'));
        assert!(is_query(b'?'));
        assert!(!is_query(b'#'));
        assert!(!is_user(b':'));
        assert!(is_userinfo(b':'));
        assert!(is_token(b'~'));
        assert!(!is_token(b','));
        assert!(is_header_value(b'\t'));
        assert!(!is_header_value(b'\r'));
        assert!(!is_cookie_name(b';'));
        assert!(is_cookie_name(b'a'));
    }

    #[test]
    fn test_hash_is_case_insensitive() {
        assert_eq!(hash_to_lowercase(b"Content-Type"), hash_to_lowercase(b"content-type"));
        assert_ne!(hash_to_lowercase(b"accept"), hash_to_lowercase(b"host"));
    }
}
