//! URL slugs from Portuguese titles.

/// Turn a title into a URL slug.
///
/// Accented Latin letters fold to ASCII, everything else that is not
/// alphanumeric, whitespace, `-` or `_` is dropped, and runs of whitespace
/// or hyphens become a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(fold_accent) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

fn fold_accent(c: char) -> impl Iterator<Item = char> {
    let folded: &'static str = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'É' | 'È' | 'Ê' | 'Ë' => "E",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'Í' | 'Ì' | 'Î' | 'Ï' => "I",
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => "o",
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => "O",
        'ú' | 'ù' | 'û' | 'ü' => "u",
        'Ú' | 'Ù' | 'Û' | 'Ü' => "U",
        'ç' => "c",
        'Ç' => "C",
        'ñ' => "n",
        'Ñ' => "N",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        _ => "",
    };
    let original = if folded.is_empty() { Some(c) } else { None };
    folded.chars().chain(original)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_portuguese() {
        assert_eq!(slugify("Válvula de Esfera"), "valvula-de-esfera");
        assert_eq!(slugify("Conexões Tubulares"), "conexoes-tubulares");
        assert_eq!(slugify("Tês 90"), "tes-90");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Aço -- Carbono  "), "aco-carbono");
        assert_eq!(slugify("Pressão: 150 PSI!"), "pressao-150-psi");
        assert_eq!(slugify("1/2\" Inox"), "12-inox");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
