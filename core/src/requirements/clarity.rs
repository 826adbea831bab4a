use super::model::ClarityScore;

/// Length heuristic over whitespace-delimited tokens.
pub fn clarity_score(text: &str) -> ClarityScore {
    let tokens = text.split_whitespace().count();
    let (score, comment) = if tokens > 20 {
        (8, "Good specificity")
    } else if tokens > 10 {
        (6, "Add more details")
    } else {
        (4, "Too vague")
    };
    ClarityScore {
        score,
        comment: comment.to_string(),
    }
}
