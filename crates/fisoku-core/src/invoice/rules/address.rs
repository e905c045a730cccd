//! Shop address.

use super::KeywordSet;

/// First line with an address keyword, joined with the next line when that
/// one carries an address keyword too.
pub fn extract_address(lines: &[String], keywords: &KeywordSet) -> Option<String> {
    let index = lines.iter().position(|line| keywords.is_match(line))?;
    let mut address = lines[index].clone();

    if let Some(next) = lines.get(index + 1).filter(|line| keywords.is_match(line)) {
        address.push_str(", ");
        address.push_str(next);
    }

    Some(address)
}
