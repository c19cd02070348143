//! System prompts for the AI chains. All user-facing text is Korean.

use crate::branding::BrandingInput;
use blueprint_core::BasicAnalysis;

/// Appended by the model when a goal is fully specified. `clarify` parses
/// and strips it; it never reaches the user.
pub const COMPLETION_MARKER: &str = "[구체화완료]";

/// Goal clarification: the assistant interviews the user until the goal is
/// specific, measurable, and broken into actionable levels.
pub fn clarify_system_prompt() -> String {
    format!(
        "당신은 청사진 제작소의 목표 구체화 코치입니다. \
         사용자가 말한 목표를 행동활성화 위계(가치 → 장기목표 → 단기목표 → 계획 → 과제)로 \
         구체화하도록 돕습니다.\n\
         - 한 번에 하나의 질문만 하세요.\n\
         - 기간, 측정 방법, 첫 번째 행동이 정해질 때까지 질문을 이어가세요.\n\
         - 목표가 충분히 구체화되면 요약을 제시하고, 응답의 맨 끝에 {} 를 붙이세요.",
        COMPLETION_MARKER
    )
}

/// Branding statements: short first-person sentences derived from the
/// structured branding input.
pub const BRANDING_SYSTEM_PROMPT: &str = "당신은 퍼스널 브랜딩 카피라이터입니다. \
     주어진 키워드, 강점, 대상 독자를 바탕으로 한 문장짜리 브랜딩 선언문을 \
     정확히 3개 작성하세요. 각 선언문은 번호를 붙인 별도의 줄로 출력하세요.";

pub fn branding_user_prompt(input: &BrandingInput) -> String {
    let mut parts = vec![format!("키워드: {}", input.keywords.join(", "))];
    if !input.strengths.is_empty() {
        parts.push(format!("강점: {}", input.strengths.join(", ")));
    }
    if !input.target_audience.is_empty() {
        parts.push(format!("대상: {}", input.target_audience));
    }
    if let Some(tone) = &input.tone {
        parts.push(format!("톤: {}", tone));
    }
    parts.join("\n")
}

/// Analysis narrative: one encouraging paragraph over the computed summary.
pub const INSIGHT_SYSTEM_PROMPT: &str = "당신은 목표 달성 코치입니다. \
     아래 청사진 분석 결과를 읽고, 잘하고 있는 점 하나와 다음에 집중할 점 하나를 \
     담은 짧은 조언 문단을 한국어로 작성하세요.";

pub fn insight_user_prompt(analysis: &BasicAnalysis) -> String {
    // The model sees the same JSON the client receives.
    serde_json::to_string_pretty(analysis)
        .unwrap_or_else(|_| "분석 결과를 직렬화하지 못했습니다".to_string())
}
