//! User-facing text. The deployment is Japanese-language only.

pub const PAGE_TITLE: &str = "健康チェック結果ページ";
pub const REPORT_TITLE: &str = "AIによる目の健康評価 結果";

pub const MISSING_ACCESS_CODE: &str = "アクセス番号（バーコード）を確認できませんでした。";
pub const VERIFY_PROMPT: &str = "結果をご覧いただくために、ご本人確認をお願いします。";
pub const BIRTHDATE_REQUIRED: &str = "誕生日を入力してください。";
pub const NO_MATCH: &str = "入力された情報と登録情報が一致しませんでした。";
pub const NO_MATCH_HINTS: [&str; 2] = [
    "結果表示用のバーコードをもう一度読み直してみてください。",
    "誕生日を正しく入力したかご確認ください（例: 1990-01-01）。",
];
pub const TOO_MANY_ATTEMPTS: &str =
    "確認の試行回数が上限に達しました。しばらく時間をおいてから再度お試しください。";
pub const SESSION_EXPIRED: &str = "本人確認の有効期限が切れました。もう一度誕生日を入力してください。";

pub const HISTORY_NOT_FOUND: &str = "指定された履歴が見つかりませんでした。";
pub const ANALYSIS_PENDING: &str = "現在、AIによる解析中です。";
pub const NO_DATA: &str = "データなし";
pub const UNREGISTERED: &str = "未登録";
pub const IMAGE_NOT_CAPTURED: &str = "画像は未撮影です。";
pub const IMAGE_UNAVAILABLE: &str = "画像を取得できませんでした";

pub const DISCLAIMER: [&str; 2] = [
    "この結果はAIによる健康リスク推定です。診断ではありません。",
    "気になる点がある場合は、必ず医療機関にご相談ください。",
];
pub const BARCODE_CAPTION: &str = "次回利用時にはこのバーコードをカメラに読ませてください";

pub const FEEDBACK_THANKS: &str = "アンケートへのご協力ありがとうございました。";
pub const FEEDBACK_ALREADY_SUBMITTED: &str = "アンケートはすでにご回答いただいています。";
pub const FEEDBACK_INVALID: &str = "アンケートの入力内容をご確認ください。";

pub const GENERIC_ERROR: &str =
    "エラーが発生しました。時間をおいてから再度お試しください。";
pub const NOT_FOUND: &str = "ページが見つかりませんでした。";
