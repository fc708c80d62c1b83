use rand::Rng;

const CODE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 生成小写字母与数字组成的随机码
pub fn generate_random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_and_charset() {
        for len in [1, 8, 16] {
            let code = generate_random_code(len);
            assert_eq!(code.len(), len);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn test_codes_differ() {
        let a = generate_random_code(16);
        let b = generate_random_code(16);
        assert_ne!(a, b);
    }
}
