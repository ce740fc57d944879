/// Utilitários para exibir segredos em logs sem expô-los por inteiro

/// Trunca uma string sem cortar um caractere UTF-8 ao meio
///
/// # Exemplo
/// ```
/// use tiktok_publish_proxy::utils::string_utils::truncate_safe;
///
/// assert_eq!(truncate_safe("Olá, mundo!", 3), "Ol");
/// ```
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Trunca e adiciona um sufixo (ex: "...") apenas quando algo foi cortado
pub fn truncate_with_suffix(s: &str, max_bytes: usize, suffix: &str) -> String {
    let truncated = truncate_safe(s, max_bytes);
    if truncated.len() < s.len() {
        format!("{}{}", truncated, suffix)
    } else {
        truncated.to_string()
    }
}

/// Prefixo curto de um token/code para correlacionar logs
pub fn mask_secret(secret: &str) -> String {
    truncate_with_suffix(secret, 8, "...")
}
