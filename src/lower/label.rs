//! Id ↔ label derivation.

/// Turn a camelCase id into a sentence-case label.
///
/// All-uppercase ids are kept as they are. Otherwise the first letter is
/// upper-cased and every upper-case letter or start of a digit run begins a
/// new lower-case word: `bucketName` → `Bucket name`, `path2` → `Path 2`.
pub fn transform_id_into_label(id: &str) -> String {
    if id.to_uppercase() == id {
        return id.to_string();
    }

    let mut label = String::with_capacity(id.len() + 4);
    let mut prev: Option<char> = None;
    for c in id.chars() {
        match prev {
            None => label.extend(c.to_uppercase()),
            Some(p) if c.is_uppercase() || (c.is_ascii_digit() && !p.is_ascii_digit()) => {
                label.push(' ');
                label.extend(c.to_lowercase());
            }
            Some(_) => label.push(c),
        }
        prev = Some(c);
    }
    label
}

/// Derive a camelCase field name from a label: `Bucket name` → `bucketName`.
/// Returns `None` when the label has no alphanumeric content.
pub fn derive_name_from_label(label: &str) -> Option<String> {
    let words: Vec<&str> = label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let (first, rest) = words.split_first()?;
    let mut name = first.to_lowercase();
    for word in rest {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            name.extend(c.to_uppercase());
            name.push_str(&chars.as_str().to_lowercase());
        }
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_becomes_sentence() {
        assert_eq!(transform_id_into_label("bucketName"), "Bucket name");
        assert_eq!(transform_id_into_label("key"), "Key");
        assert_eq!(transform_id_into_label("s3Path2"), "S 3 path 2");
    }

    #[test]
    fn uppercase_ids_are_preserved() {
        assert_eq!(transform_id_into_label("URL"), "URL");
        assert_eq!(transform_id_into_label("AWS_REGION"), "AWS_REGION");
    }

    #[test]
    fn name_from_label() {
        assert_eq!(derive_name_from_label("Bucket name").as_deref(), Some("bucketName"));
        assert_eq!(derive_name_from_label("API key").as_deref(), Some("apiKey"));
        assert_eq!(derive_name_from_label("  -- "), None);
    }
}
