use super::model::Dialect;

// American -> British pairs. No British value contains an American key, so a
// second British pass is a no-op.
const AMERICAN_TO_BRITISH: [(&str, &str); 6] = [
    ("color", "colour"),
    ("organize", "organise"),
    ("realize", "realise"),
    ("behavior", "behaviour"),
    ("center", "centre"),
    ("meter", "metre"),
];

/// Literal, case-sensitive substring replacement; not word-boundary aware.
pub fn adjust_dialect(text: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::American => text.to_string(),
        Dialect::British => {
            let mut out = text.to_string();
            for (us, uk) in AMERICAN_TO_BRITISH {
                out = out.replace(us, uk);
            }
            out
        }
    }
}
