/// Derive a URL slug from a recipe title.
///
/// Lowercases, turns each run of whitespace into a single `-`, then drops
/// every character outside `[a-z0-9-]`. Slugs are not deduplicated.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    slug
}
