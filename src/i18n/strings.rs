use super::Language;

/// Localized user-facing strings for one language.
#[derive(Debug)]
pub struct Strings {
    pub placeholder: &'static str,
    pub welcome: &'static str,
    pub typing: &'static str,
    pub error: &'static str,
    pub thank_you: &'static str,
    pub send: &'static str,
    pub sending: &'static str,
    pub feedback_prompt: &'static str,
    pub feedback_like: &'static str,
    pub feedback_dislike: &'static str,
    pub feedback_skip: &'static str,
    pub feedback_comment: &'static str,
}

static EN: Strings = Strings {
    placeholder: "Type your message...",
    welcome: "Hello! I'm your AI assistant. How can I help you today?",
    typing: "AI is typing...",
    error: "Sorry, there was an error. Please try again.",
    thank_you: "Thank you for your feedback!",
    send: "Send",
    sending: "Sending...",
    feedback_prompt: "Was this response helpful?",
    feedback_like: "👍 Helpful",
    feedback_dislike: "👎 Not helpful",
    feedback_skip: "Skip",
    feedback_comment: "Any comments? (optional)",
};

static AR: Strings = Strings {
    placeholder: "اكتب رسالتك...",
    welcome: "مرحباً! أنا مساعدك الذكي. كيف يمكنني مساعدتك اليوم؟",
    typing: "الذكي الاصطناعي يكتب...",
    error: "عذراً، حدث خطأ. يرجى المحاولة مرة أخرى.",
    thank_you: "شكراً لك على ملاحظاتك!",
    send: "إرسال",
    sending: "جارٍ الإرسال...",
    feedback_prompt: "هل كانت هذه الإجابة مفيدة؟",
    feedback_like: "👍 مفيدة",
    feedback_dislike: "👎 غير مفيدة",
    feedback_skip: "تخطي",
    feedback_comment: "هل لديك أي تعليق؟ (اختياري)",
};

impl Strings {
    pub fn get(language: Language) -> &'static Self {
        match language {
            Language::En => &EN,
            Language::Ar => &AR,
        }
    }
}

impl Language {
    /// Shorthand for [`Strings::get`].
    pub fn strings(self) -> &'static Strings {
        Strings::get(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_languages_have_distinct_strings() {
        let en = Strings::get(Language::En);
        let ar = Strings::get(Language::Ar);
        assert_ne!(en.placeholder, ar.placeholder);
        assert_ne!(en.welcome, ar.welcome);
        assert_ne!(en.error, ar.error);
        assert_ne!(en.thank_you, ar.thank_you);
    }

    #[test]
    fn test_english_strings() {
        let en = Language::En.strings();
        assert_eq!(en.placeholder, "Type your message...");
        assert_eq!(en.error, "Sorry, there was an error. Please try again.");
    }

    #[test]
    fn test_no_empty_strings() {
        for lang in [Language::En, Language::Ar] {
            let s = lang.strings();
            for text in [
                s.placeholder,
                s.welcome,
                s.typing,
                s.error,
                s.thank_you,
                s.send,
                s.sending,
                s.feedback_prompt,
                s.feedback_like,
                s.feedback_dislike,
                s.feedback_skip,
                s.feedback_comment,
            ] {
                assert!(!text.is_empty());
            }
        }
    }
}
