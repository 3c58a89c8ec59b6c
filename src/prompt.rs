// src/prompt.rs
use crate::scenario::Scenario;

/// Reply used when the backend answers without any text.
pub const NO_ANSWER: &str = "抱歉，我无法回答这个问题。";

/// Reply used when the backend fails and the player did ask something.
pub const SERVICE_UNAVAILABLE: &str = "抱歉，AI服务暂时不可用。请检查网络连接或稍后再试。";

/// Reply used when the backend fails and the input did not look like a question.
pub const ASK_YES_NO: &str = "请问一个是非问题，比如\"他是男人吗？\"";

pub const WELCOME_PREFIX: &str = "欢迎来到";

const UNSET_KEY: &str = "未设置";

const INTERROGATIVE_MARKERS: [char; 4] = ['是', '吗', '?', '？'];

/// Instructions given to the host. The victory rule fires when the player touches the key element.
pub fn system_prompt(scenario: &Scenario) -> String {
    format!(
        r#"你是海龟汤游戏的主持人。游戏规则：

游戏题目：{title}
谜面：{description}
真相：{answer}
关键元素：{key}

你的职责：
1. 只能回答"是"、"否"、"无关"或"不能这样问"
2. 根据真相判断用户问题的答案
3. 如果问题与真相相符，回答"是"
4. 如果问题与真相不符，回答"否"
5. 如果问题与真相无关，回答"无关"
6. 如果问题不是是非问题，回答"不能这样问，请问是非问题"
7. 保持神秘感，不要直接透露答案
8. 可以在回答后给出简短的引导性提示
9. **重要**：当用户的问题或猜测涉及到"关键元素"中描述的内容时，立即恭喜用户成功并公布完整真相。例如："恭喜你！你猜对了！真相是：[完整答案]"
10. 关键元素是破解谜题的核心，一旦用户提到或猜测到这个元素，游戏就结束了

请严格按照规则回答，保持简洁。"#,
        title = scenario.title,
        description = scenario.description,
        answer = scenario.answer,
        key = scenario.key_element().unwrap_or(UNSET_KEY),
    )
}

pub fn welcome_message(scenario: &Scenario) -> String {
    format!(
        "{WELCOME_PREFIX}《{}》！\n\n{}\n\n你可以问我任何是非问题来推理出真相。记住，我只能回答\"是\"、\"否\"或\"无关\"。",
        scenario.title, scenario.description
    )
}

pub fn has_interrogative_marker(question: &str) -> bool {
    question.contains(INTERROGATIVE_MARKERS)
}

/// Static reply picked when the completion backend cannot be used.
pub fn fallback_reply(question: &str) -> &'static str {
    if has_interrogative_marker(question) {
        SERVICE_UNAVAILABLE
    } else {
        ASK_YES_NO
    }
}
