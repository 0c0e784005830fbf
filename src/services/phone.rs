// ==========================================
// 零件定位系统 - 电话号码规范化
// ==========================================
// 职责: 本地号码空白规范化；转换为不带 '+' 的 E.164 数字串
// 说明: 只覆盖阿根廷号码的常见写法，不做完整号码校验
// ==========================================

use regex::Regex;
use std::sync::OnceLock;

/// 默认国家代码（阿根廷）
pub const DEFAULT_COUNTRY_CODE: &str = "54";

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("常量正则"))
}

fn non_digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9]").expect("常量正则"))
}

/// 合并连续空白并去除首尾空白
pub fn normalize_local_phone(phone: &str) -> String {
    whitespace_re().replace_all(phone, " ").trim().to_string()
}

/// 转换为 E.164 数字串（不带 '+'）
///
/// # 规则
/// 1. 去掉所有非数字字符
/// 2. 去掉国际前缀 00
/// 3. 去掉一个前导 0（国内长途前缀）
/// 4. 剩余超过 8 位时去掉前导 15（手机前缀）
/// 5. 不以国家代码开头时补上国家代码
///
/// # 返回
/// - None: 输入为空或不含数字
pub fn to_e164_digits(phone: &str, country_code: &str) -> Option<String> {
    let mut digits = non_digit_re().replace_all(phone, "").into_owned();
    if digits.is_empty() {
        return None;
    }

    if let Some(rest) = digits.strip_prefix("00") {
        digits = rest.to_string();
    }
    if let Some(rest) = digits.strip_prefix('0') {
        digits = rest.to_string();
    }
    if digits.starts_with("15") && digits.len() > 8 {
        digits = digits[2..].to_string();
    }
    if !digits.starts_with(country_code) {
        digits = format!("{}{}", country_code, digits);
    }

    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_phone() {
        assert_eq!(normalize_local_phone("  11   5555-1234 \t"), "11 5555-1234");
        assert_eq!(normalize_local_phone(""), "");
    }

    #[test]
    fn test_to_e164_local_numbers() {
        assert_eq!(to_e164_digits("11 5555-1234", "54").as_deref(), Some("541155551234"));
        assert_eq!(to_e164_digits("221 444-7788", "54").as_deref(), Some("542214447788"));
        assert_eq!(to_e164_digits("011 4667-8899", "54").as_deref(), Some("541146678899"));
    }

    #[test]
    fn test_to_e164_prefixes() {
        // 国际前缀
        assert_eq!(to_e164_digits("0054 11 5555 1234", "54").as_deref(), Some("541155551234"));
        // 已带国家代码
        assert_eq!(to_e164_digits("+54 341 555-6677", "54").as_deref(), Some("543415556677"));
        // 手机前缀 15（剩余位数 > 8）
        assert_eq!(to_e164_digits("15 5555-12345", "54").as_deref(), Some("54555512345"));
        // 短号码不去 15
        assert_eq!(to_e164_digits("1555-1234", "54").as_deref(), Some("5415551234"));
    }

    #[test]
    fn test_to_e164_empty() {
        assert_eq!(to_e164_digits("", "54"), None);
        assert_eq!(to_e164_digits("sin número", "54"), None);
    }
}
