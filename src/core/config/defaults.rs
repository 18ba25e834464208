pub const RETRIEVAL_TOOL_NAME: &str = "retrieve_blog_posts";

pub const RETRIEVAL_TOOL_DESCRIPTION: &str =
    "사용자의 질문과 의미적으로 가장 유사한 회사 매뉴얼 내용을 검색합니다.";

/// Customer-service manual loaded into the store at startup.
pub fn seed_documents() -> Vec<String> {
    [
        "반품은 구매 후 30일 이내에만 가능하며, 영수증이 필요합니다.",
        "배송은 평일 기준 2~3일 소요되며, 도서 산간 지역은 하루 더 걸립니다.",
        "회원 가입 시 10% 할인 쿠폰을 즉시 지급합니다.",
        "고객 센터 운영 시간은 오전 9시부터 오후 6시까지입니다.",
        "환불은 계좌 이체로 처리되며, 3~5 영업일 소요됩니다.",
        "무료 배송은 3만원 이상 구매 시 적용됩니다.",
        "주말 및 공휴일에는 고객센터가 운영되지 않습니다.",
        "제품 하자 시 전액 환불 또는 교환이 가능합니다.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
