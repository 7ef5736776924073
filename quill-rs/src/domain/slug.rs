//! URL slugs from titles and tag names.

/// Lowercase ASCII alphanumerics, every other run of characters collapsed into one `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `base`, or `base-2`, `base-3`, ... for the `attempt`-th collision.
pub fn with_suffix(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_owned()
    } else {
        format!("{}-{}", base, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_table() {
        let cases = [
            ("My First Post", "my-first-post"),
            ("  Hello,   World!  ", "hello-world"),
            ("Rust 2021 -- edition", "rust-2021-edition"),
            ("Crème brûlée", "cr-me-br-l-e"),
            ("!!!", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(slugify(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn suffixes_start_at_two() {
        assert_eq!(with_suffix("post", 1), "post");
        assert_eq!(with_suffix("post", 2), "post-2");
    }
}
