//! Localized string tables.
//!
//! Every user-facing sentence the backend produces lives here, one table
//! per supported language. Templates use `{name}` / `{dose}` placeholders
//! filled by [`fill`].

use serde::{Deserialize, Serialize};

/// Supported display languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
    Tr,
}

impl Locale {
    /// Parse a device locale tag (`ar`, `ar-SA`, `tr_TR`). Unknown
    /// languages fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let lang = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match lang.as_str() {
            "ar" => Self::Ar,
            "tr" => Self::Tr,
            _ => Self::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
            Self::Tr => "tr",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Self::En => &EN,
            Self::Ar => &AR,
            Self::Tr => &TR,
        }
    }
}

/// One language's worth of backend text.
#[derive(Debug)]
pub struct Strings {
    // Reminder notification text
    pub reminder_title: &'static str,
    pub reminder_body: &'static str,
    pub clause_empty_stomach: &'static str,
    pub clause_full_stomach: &'static str,

    // Medication form errors
    pub missing_name: &'static str,
    pub missing_dose: &'static str,
    pub invalid_dose: &'static str,
    pub invalid_value: &'static str,
    pub duplicate_name: &'static str,
    pub store_unavailable: &'static str,
    pub medication_not_found: &'static str,

    // Auth form errors
    pub missing_login_fields: &'static str,
    pub missing_register_fields: &'static str,
    pub password_mismatch: &'static str,
    pub auth_invalid_email: &'static str,
    pub auth_user_not_found: &'static str,
    pub auth_wrong_password: &'static str,
    pub auth_email_in_use: &'static str,
    pub auth_generic: &'static str,

    // Assistant fallbacks
    pub assistant_no_reply: &'static str,
    pub assistant_quota: &'static str,
    pub assistant_api_key: &'static str,
    pub assistant_network: &'static str,
    pub assistant_generic: &'static str,
}

static EN: Strings = Strings {
    reminder_title: "Reminder: {name}",
    reminder_body: "Take {dose} of {name}",
    clause_empty_stomach: " on an empty stomach",
    clause_full_stomach: " after a meal",

    missing_name: "Please enter the medication name.",
    missing_dose: "Please enter the dose amount.",
    invalid_dose: "Please enter a dose greater than zero.",
    invalid_value: "Please check the values you entered.",
    duplicate_name: "You already have a medication named {name}.",
    store_unavailable: "Could not reach your medication list. Check your connection and try again.",
    medication_not_found: "This medication no longer exists.",

    missing_login_fields: "Please enter your email and password.",
    missing_register_fields: "Please fill in all fields.",
    password_mismatch: "Password and confirmation do not match.",
    auth_invalid_email: "The email address is invalid.",
    auth_user_not_found: "No account exists for this email.",
    auth_wrong_password: "The password is incorrect.",
    auth_email_in_use: "This email is already in use.",
    auth_generic: "Something went wrong, please try again.",

    assistant_no_reply: "The assistant did not return a reply.",
    assistant_quota: "Sorry, the free usage limit of the AI service has been reached. Wait a little and try again, or check your Google Cloud account.",
    assistant_api_key: "The AI service API key is invalid. Please check the key settings.",
    assistant_network: "Could not connect to the AI service. Check your internet connection and try again.",
    assistant_generic: "An error occurred while contacting the AI service. Please try again later.",
};

static AR: Strings = Strings {
    reminder_title: "تذكير: {name}",
    reminder_body: "تناول {dose} من {name}",
    clause_empty_stomach: " على معدة فارغة",
    clause_full_stomach: " بعد الأكل",

    missing_name: "يرجى إدخال اسم الدواء.",
    missing_dose: "يرجى إدخال كمية الجرعة.",
    invalid_dose: "يرجى إدخال جرعة أكبر من الصفر.",
    invalid_value: "يرجى التحقق من القيم المدخلة.",
    duplicate_name: "لديك دواء بنفس الاسم {name} بالفعل.",
    store_unavailable: "تعذر الوصول إلى قائمة الأدوية. تحقق من اتصالك وحاول مرة أخرى.",
    medication_not_found: "هذا الدواء لم يعد موجوداً.",

    missing_login_fields: "يرجى إدخال البريد وكلمة المرور.",
    missing_register_fields: "يرجى تعبئة جميع الحقول.",
    password_mismatch: "كلمة المرور وتأكيدها غير متطابقتين.",
    auth_invalid_email: "البريد الإلكتروني غير صحيح.",
    auth_user_not_found: "المستخدم غير موجود.",
    auth_wrong_password: "كلمة المرور غير صحيحة.",
    auth_email_in_use: "البريد الإلكتروني مستخدم بالفعل.",
    auth_generic: "حدث خطأ، حاول مرة أخرى.",

    assistant_no_reply: "لا يوجد رد من الذكاء الاصطناعي.",
    assistant_quota: "عذراً، تم تجاوز حد الاستخدام المجاني لخدمة الذكاء الاصطناعي. يمكنك الانتظار قليلاً والمحاولة لاحقاً أو التحقق من حساب Google Cloud الخاص بك.",
    assistant_api_key: "خطأ في مفتاح API. يرجى التحقق من إعدادات المفتاح.",
    assistant_network: "خطأ في الاتصال بالإنترنت. يرجى التحقق من اتصالك والمحاولة مرة أخرى.",
    assistant_generic: "حدث خطأ أثناء الاتصال بالذكاء الاصطناعي. يرجى المحاولة لاحقاً.",
};

static TR: Strings = Strings {
    reminder_title: "Hatırlatma: {name}",
    reminder_body: "{name} ilacından {dose} doz alın",
    clause_empty_stomach: " (aç karnına)",
    clause_full_stomach: " (yemekten sonra)",

    missing_name: "Lütfen ilaç adını girin.",
    missing_dose: "Lütfen doz miktarını girin.",
    invalid_dose: "Lütfen sıfırdan büyük bir doz girin.",
    invalid_value: "Lütfen girdiğiniz değerleri kontrol edin.",
    duplicate_name: "{name} adında bir ilacınız zaten var.",
    store_unavailable: "İlaç listenize ulaşılamadı. Bağlantınızı kontrol edip tekrar deneyin.",
    medication_not_found: "Bu ilaç artık mevcut değil.",

    missing_login_fields: "Lütfen e-posta ve şifrenizi girin.",
    missing_register_fields: "Lütfen tüm alanları doldurun.",
    password_mismatch: "Şifre ve şifre tekrarı eşleşmiyor.",
    auth_invalid_email: "E-posta adresi geçersiz.",
    auth_user_not_found: "Bu e-posta ile kayıtlı kullanıcı yok.",
    auth_wrong_password: "Şifre yanlış.",
    auth_email_in_use: "Bu e-posta zaten kullanımda.",
    auth_generic: "Bir hata oluştu, lütfen tekrar deneyin.",

    assistant_no_reply: "Yapay zekâdan yanıt gelmedi.",
    assistant_quota: "Üzgünüz, yapay zekâ hizmetinin ücretsiz kullanım sınırı aşıldı. Biraz bekleyip tekrar deneyin veya Google Cloud hesabınızı kontrol edin.",
    assistant_api_key: "API anahtarı hatalı. Lütfen anahtar ayarlarını kontrol edin.",
    assistant_network: "İnternet bağlantı hatası. Lütfen bağlantınızı kontrol edip tekrar deneyin.",
    assistant_generic: "Yapay zekâ hizmetine bağlanırken bir hata oluştu. Lütfen daha sonra tekrar deneyin.",
};

/// Substitute `{name}` and `{dose}` placeholders in a template.
pub fn fill(template: &str, name: &str, dose: &str) -> String {
    template.replace("{name}", name).replace("{dose}", dose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_tag_with_region() {
        assert_eq!(Locale::from_tag("ar-SA"), Locale::Ar);
        assert_eq!(Locale::from_tag("tr_TR"), Locale::Tr);
        assert_eq!(Locale::from_tag("EN-us"), Locale::En);
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        assert_eq!(Locale::from_tag("fr-FR"), Locale::En);
        assert_eq!(Locale::from_tag(""), Locale::En);
    }

    #[test]
    fn every_table_carries_placeholders() {
        for locale in [Locale::En, Locale::Ar, Locale::Tr] {
            let s = locale.strings();
            assert!(s.reminder_title.contains("{name}"), "{}", locale.as_str());
            assert!(s.reminder_body.contains("{name}"), "{}", locale.as_str());
            assert!(s.reminder_body.contains("{dose}"), "{}", locale.as_str());
            assert!(s.duplicate_name.contains("{name}"), "{}", locale.as_str());
        }
    }

    #[test]
    fn fill_replaces_all_occurrences() {
        assert_eq!(fill("{name}/{name} x{dose}", "A", "2"), "A/A x2");
    }
}
