// ui/constants.rs

pub const TITLE: &str = r#" _____           _   _        ____
|_   _|   _ _ __| |_| | ___  / ___|  ___  _   _ _ __
  | || | | | '__| __| |/ _ \ \___ \ / _ \| | | | '_ \
  | || |_| | |  | |_| |  __/  ___) | (_) | |_| | |_) |
  |_| \__,_|_|   \__|_|\___| |____/ \___/ \__,_| .__/
                                               |_|
"#;

pub const TURTLE: &str = r#"      ____
    /      \  __
   | () () |/ o \
    \______/\__/
     ||  ||
"#;

pub const RULES: [&str; 4] = [
    "选择一个故事，向主持人提出可以用是或否回答的问题",
    "主持人只会回答：是 / 否 / 无关，或请你换个问法",
    "先从大方向问起：谁、何时、何地、为什么，再逐步缩小范围",
    "猜中关键元素，主持人就会公布完整真相",
];

// F1 to F4 in the chat view.
pub const QUICK_QUESTIONS: [&str; 4] = [
    "这个人是男性吗？",
    "有人死了吗？",
    "这是意外吗？",
    "时间很重要吗？",
];
