//! Built-in dictionaries. Pure data; the engine sorts and compiles them.

/// Keyword and identifier fragments -> CJK replacements.
/// No replacement is a substring of another; `find_reverse_conflicts` must stay empty.
pub const TOKENS: &[(&str, &str)] = &[
    // keywords
    ("function", "函"),
    ("return", "返"),
    ("const", "常"),
    ("let", "让"),
    ("var", "变"),
    ("if", "如"),
    ("else", "否"),
    ("for", "循"),
    ("while", "当"),
    ("do", "做"),
    ("switch", "切"),
    ("case", "例"),
    ("break", "断"),
    ("continue", "续"),
    ("default", "默"),
    ("try", "试"),
    ("catch", "捕"),
    ("finally", "终"),
    ("throw", "抛"),
    ("new", "新"),
    ("this", "此"),
    ("class", "类"),
    ("extends", "承"),
    ("super", "超"),
    ("import", "导"),
    ("export", "出"),
    ("from", "源"),
    ("async", "异"),
    ("await", "等"),
    ("yield", "产"),
    ("typeof", "型"),
    ("instanceof", "属"),
    ("delete", "删"),
    ("true", "真"),
    ("false", "假"),
    ("null", "空"),
    ("undefined", "未"),
    // common identifiers
    ("document", "档"),
    ("window", "窗"),
    ("length", "长"),
    ("push", "推"),
    ("map", "映"),
    ("filter", "滤"),
    ("reduce", "归"),
    ("forEach", "遍"),
    ("then", "然"),
    ("Promise", "诺"),
    ("fetch", "拉"),
    ("response", "应"),
    ("request", "询"),
    ("error", "误"),
    ("data", "资"),
    ("result", "果"),
    ("value", "值"),
    ("options", "项"),
    ("prototype", "原"),
    ("constructor", "构"),
    ("require", "需"),
    ("setTimeout", "延"),
    ("addEventListener", "听"),
    ("querySelector", "查"),
    ("getElementById", "寻"),
    ("get", "拿"),
    ("set", "置"),
    // compound fragments
    ("console.log", "控印"),
    ("console.error", "控错"),
    ("JSON.stringify", "序串"),
    ("JSON.parse", "析串"),
    ("module.exports", "模组"),
    ("Object.keys", "物键"),
    ("Array.isArray", "阵判"),
];

/// Whole-pattern templates -> symbol targets. Symbols come from the Hangul Jamo,
/// Tibetan, Georgian, Cham and Tai Viet blocks so the classifier can spot them.
pub const PATTERNS: &[(&str, &str)] = &[
    (
        "try { const $1 = await fetch($2); const $3 = await $1.json(); return $3; } catch ($4) { console.error($4); }",
        "ᄀ($1,$2,$3,$4)",
    ),
    ("fetch($1).then(($2) => $2.json())", "ᄁ($1,$2)"),
    (
        "document.querySelector($1).addEventListener($2, ($3) => {",
        "ᄂ($1,$2,$3)",
    ),
    ("for (let $1 = 0; $1 < $2.length; $1++) {", "ᄃ($1,$2)"),
    ("new Promise(($1, $2) => {", "ᄆ($1,$2)"),
    ("Object.keys($1).forEach(($2) => {", "ᄇ($1,$2)"),
    ("if (!$1) { throw new Error($2); }", "ᄈ($1,$2)"),
    (
        "return new Promise(($1) => setTimeout($1, $2));",
        "ᄊ($1,$2)",
    ),
    ("const $1 = require($2);", "ཀ($2,$1)"),
    ("export default $1;", "ཁ($1)"),
    ("if ($1 === undefined) { $1 = $2; }", "ཅ($1,$2)"),
    ("headers: { 'Content-Type': 'application/json' }", "ა"),
    ("JSON.stringify($1, null, 2)", "ბ($1)"),
    ("method: 'POST'", "ꨀ.ꨁ"),
    ("method: 'GET'", "ꨀ.ꨂ"),
    ("async ($1) => {", "ꪀ($1)"),
];

/// Words that show up untranslated in comments of model-written compressed code.
/// Applied only inside comments by the repair pass; no term shares a character
/// with a TOKENS replacement.
pub const COMMENT_GLOSSARY: &[(&str, &str)] = &[
    ("初始化", "initialize"),
    ("获取", "fetch"),
    ("用户", "user"),
    ("数据", "data"),
    ("请求", "request"),
    ("故障", "failure"),
    ("校验", "validate"),
    ("处理", "handle"),
    ("设定", "settings"),
    ("缓存", "cache"),
    ("列表", "list"),
    ("页面", "page"),
    ("按钮", "button"),
    ("登录", "login"),
];
