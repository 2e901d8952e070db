//! User-facing chat texts.

pub const WELCOME_TEXT: &str = "
欢迎使用本投稿机器人，您可以使用如下命令：

/submit - 使用这个命令可以开始投稿
/template - 使用这个命令可以获取投稿模板

Tip1：投稿时请按照模板格式来编写稿件
Tip2: 如果您未设置TG账号的用户名，建议您在联系方式留下其他联系方式，否则对方无法联系上您，这个很重要
";

pub const SUBMISSION_PROMPT: &str = "请输入你的投稿内容：";

pub const SUBMISSION_RECEIVED: &str = "感谢你的投稿！管理员会尽快审核。";

pub const SUBMISSION_FAILED: &str = "投稿提交失败，请稍后重新发送。";

pub const INVALID_FORMAT_PREFIX: &str = "格式不正确，请按照以下模板提交：";

/// Shown to a reviewer whose button payload could not be processed
pub const DECISION_FAILED: &str = "处理投稿时出错";

/// Shown to a reviewer acting on a handle that is no longer pending
pub const DECISION_NOT_FOUND: &str = "投稿不存在或已被审核";

pub fn invalid_format_text(template: &str) -> String {
    format!("{}\n{}", INVALID_FORMAT_PREFIX, template)
}
