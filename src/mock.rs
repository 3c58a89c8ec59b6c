// src/mock.rs
// Canned host answers so the game stays playable without a completion credential.
use rand::{Rng, seq::IndexedRandom};

pub const YES: &str = "是的。";
pub const NO: &str = "不是。";
pub const YES_IMPORTANT: &str = "是的，这很重要。";
pub const REPHRASE: &str = "不能这样问，请问是非问题。";

pub const OFFLINE_BANNER: &str =
    "⚠️ 没有可用的AI主持人（OpenAI API未配置）。\n\n作为演示，我会给出模拟回答：\n\n";

/// Replies the proxy picks from when it runs without a credential.
pub const CANNED_REPLIES: [&str; 7] = [
    "是的，你的推理很有道理。",
    "不，这个方向可能不对。",
    "这个细节无关紧要。",
    "请重新表述你的问题。",
    "你很接近真相了！",
    "这是一个很好的问题，答案是肯定的。",
    "不，事情没有那么简单。",
];

pub fn mock_response<R: Rng + ?Sized>(question: &str, rng: &mut R) -> &'static str {
    let question = question.to_lowercase();
    let mentions = |terms: &[&str]| terms.iter().any(|term| question.contains(term));

    if mentions(&["男", "女"]) {
        YES
    } else if mentions(&["死", "杀"]) {
        YES_IMPORTANT
    } else if mentions(&["为什么", "怎么"]) {
        REPHRASE
    } else if rng.random_bool(0.5) {
        YES
    } else {
        NO
    }
}

pub fn canned_reply<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CANNED_REPLIES.choose(rng).copied().unwrap_or(REPHRASE)
}

pub fn offline_notice<R: Rng + ?Sized>(question: &str, rng: &mut R) -> String {
    format!("{OFFLINE_BANNER}{}", mock_response(question, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn keywords_take_priority_in_order() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(mock_response("他是男人吗？", &mut rng), YES);
        assert_eq!(mock_response("有人死了吗？", &mut rng), YES_IMPORTANT);
        assert_eq!(mock_response("女人杀了他吗", &mut rng), YES);
        assert_eq!(mock_response("他为什么自杀", &mut rng), YES_IMPORTANT);
        assert_eq!(mock_response("为什么会这样", &mut rng), REPHRASE);
    }

    #[test]
    fn other_questions_get_yes_or_no() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let reply = mock_response("这是意外吗？", &mut rng);
            assert!(reply == YES || reply == NO);
        }
    }

    #[test]
    fn canned_reply_comes_from_the_list() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..16 {
            assert!(CANNED_REPLIES.contains(&canned_reply(&mut rng)));
        }
    }

    #[test]
    fn offline_notice_carries_banner_and_answer() {
        let mut rng = StdRng::seed_from_u64(3);
        let notice = offline_notice("有人死了吗", &mut rng);
        assert!(notice.starts_with(OFFLINE_BANNER));
        assert!(notice.ends_with(YES_IMPORTANT));
    }
}
