//! Game catalog
//!
//! The fixed menu of wager presets. Most pool and carom entries settle
//! as a plain win tally; the kèo độ entries each map to one of the
//! money rules. Display strings stay in Vietnamese, the way the menu
//! shows them.

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, Progression};
use crate::player::MAX_PLAYERS;
use crate::session::{Session, SessionError};

/// Menu group, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pool,
    Carom,
    Keodo,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Pool => "Pool",
            Category::Carom => "Carom",
            Category::Keodo => "Kèo Độ",
        }
    }
}

/// Seed parameters for an entry's starter configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode {
    Tally,
    Leaves { unit_price: i64 },
    Fixed99 { unit_price: i64 },
    Countdown { baseline: u32 },
    Streak { base: i64, step: i64 },
    Timed { hourly_rate: i64, minutes: u32 },
}

/// One catalog entry: display strings plus a settlement preset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub slug: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub summary: &'static str,
    pub notes: &'static [&'static str],
    pub max_players: usize,
    #[serde(skip)]
    mode: Mode,
}

impl CatalogEntry {
    /// A ready-to-edit configuration with this entry's suggested stakes.
    pub fn starter_config(&self, player_count: usize) -> GameConfig {
        match self.mode {
            Mode::Tally => GameConfig::Tally,
            Mode::Leaves { unit_price } => GameConfig::leaves(unit_price),
            Mode::Fixed99 { unit_price } => GameConfig::fixed_99(unit_price),
            Mode::Countdown { baseline } => GameConfig::countdown_even(baseline, player_count),
            Mode::Streak { base, step } => GameConfig::Streak {
                base,
                progression: Progression::Arithmetic { step },
                cap: 0,
            },
            Mode::Timed { hourly_rate, minutes } => {
                GameConfig::Timed { hourly_rate, minutes, stake: 0 }
            }
        }
    }

    /// Open a session under this entry's player limit and starter config.
    pub fn start_session<S: AsRef<str>>(&self, names: &[S]) -> Result<Session, SessionError> {
        Session::with_limit(names, self.max_players, self.starter_config(names.len()))
    }
}

static ENTRIES: [CatalogEntry; 16] = [
    CatalogEntry {
        slug: "pool-chap-game",
        name: "Pool — Chấp game (Race)",
        category: Category::Pool,
        summary: "Flow per-rack: thêm người chơi, nhập người thắng từng ván; lịch sử hiển thị dạng bảng.",
        notes: &["Thống nhất breaker, alternate break, call-shot (10-ball), golden break trước khi chơi."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "per-rack",
        name: "Per-rack — Tính chênh theo ván",
        category: Category::Pool,
        summary: "Chuẩn per-rack: chọn người thắng theo từng ván; tính tổng ván thắng/mức chênh (giả lập).",
        notes: &[],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "carom-chap-diem-co",
        name: "Carom — Chấp điểm / Chấp cơ",
        category: Category::Carom,
        summary: "Áp dụng flow per-rack để ghi nhanh kết quả ván. (Gợi ý chấp điểm/cơ ghi ở ghi chú.)",
        notes: &["A chấp B h điểm ⇒ mục tiêu B = chuẩn + h; chấp cơ là giới hạn lượt cơ (tuỳ thoả thuận)."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "pool-8-ball",
        name: "8-Ball Pool — Classic Bar Rules",
        category: Category::Pool,
        summary: "Chia nhóm 1–7 và 9–15; ai dọn hết nhóm của mình rồi ghi bi 8 đúng luật là thắng.",
        notes: &[
            "Golden break bi 8 (tuỳ luật bàn).",
            "Foul khi ghi bi 8 sai lỗ hoặc cùng bi trắng.",
        ],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "pool-9-ball",
        name: "9-Ball Pool — Rotation Game",
        category: Category::Pool,
        summary: "Đánh chạm bi nhỏ nhất trước; ghi bi 9 hợp lệ là thắng ván.",
        notes: &["Cho phép combo hợp lệ vào bi 9."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "pool-10-ball",
        name: "10-Ball Pool — Call-shot format",
        category: Category::Pool,
        summary: "Giống 9-ball nhưng phải call-shot bi 10, yêu cầu chính xác hơn.",
        notes: &["Phải chạm bi nhỏ nhất; sai lỗ = mất lượt."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "pool-straight-14-1",
        name: "14.1 Continuous (Straight Pool)",
        category: Category::Pool,
        summary: "Mỗi bi = 1 điểm; khi còn 1 bi thì rack lại 14 bi còn lại.",
        notes: &["Lỗi = trừ điểm; phải ghi 1 bi hoặc chạm 2 băng."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "pool-one-pocket",
        name: "One-Pocket",
        category: Category::Pool,
        summary: "Mỗi người một lỗ; ai ghi đủ 8 bi vào lỗ của mình trước là thắng.",
        notes: &["Thiên về chiến thuật, phòng thủ."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "pool-banks",
        name: "Banks Pool",
        category: Category::Pool,
        summary: "Chỉ tính bi đi băng trước khi vào lỗ; thường phải call-shot.",
        notes: &["Mỗi bi = 1 điểm; ai đủ 5 bi trước là thắng."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "pool-rotation",
        name: "Rotation (61-point game)",
        category: Category::Pool,
        summary: "Tổng điểm theo số trên bi; đạt ≥61 điểm trước là thắng.",
        notes: &["Phải chạm bi nhỏ nhất trước."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "pool-cutthroat",
        name: "Cutthroat (3-player game)",
        category: Category::Pool,
        summary: "3 người; ai còn bi cuối trên bàn là thắng.",
        notes: &["Nhóm bi: 1–5, 6–10, 11–15 (thường dùng)."],
        max_players: MAX_PLAYERS,
        mode: Mode::Tally,
    },
    CatalogEntry {
        slug: "ta-la",
        name: "Tá lả (tính lá thua)",
        category: Category::Keodo,
        summary: "Kèo độ kiểu tá lả: nhập lá thua cho N-1 người, người còn lại thắng = tổng lá của tất cả người thua.",
        notes: &[
            "Tối đa 4 người chơi",
            "Cấu hình tiền/1 lá thua",
            "Mỗi ván: để trống 1 người (người thắng)",
        ],
        max_players: 4,
        mode: Mode::Leaves { unit_price: 5_000 },
    },
    CatalogEntry {
        slug: "bia-99-bi-danh-den",
        name: "Bi-a 99 bi đánh đền",
        category: Category::Keodo,
        summary: "Mỗi ván để trống đúng 1 người thắng; tổng bi đền của những người thua phải đúng 99.",
        notes: &[
            "Cấu hình tiền/1 bi đền.",
            "Người thắng nhận đủ 99 bi quy ra tiền mỗi ván.",
        ],
        max_players: MAX_PLAYERS,
        mode: Mode::Fixed99 { unit_price: 1_000 },
    },
    CatalogEntry {
        slug: "99-bi-den",
        name: "99 bi đền",
        category: Category::Keodo,
        summary: "Kèo 99 bi đền: mỗi lỗi bị trừ/đền bi; ai chạm mốc đền (ví dụ 99 bi) thì thua nặng nhất. Có thể áp dụng cho 8-ball/9-ball tuỳ bàn.",
        notes: &[
            "Cấu hình tiền/1 bi đền (VD: 1k/bi, 2k/bi...).",
            "Có thể chọn mốc đền khác (ví dụ 50, 99, 199 tuỳ độ 'thơm').",
            "Flow UI: ghi số bi đền của từng người sau mỗi ván / mỗi lượt, cuối buổi tính tổng tiền.",
        ],
        max_players: MAX_PLAYERS,
        mode: Mode::Countdown { baseline: 99 },
    },
    CatalogEntry {
        slug: "keodo-gac-co",
        name: "Độ theo gác cơ (thắng giữ cơ)",
        category: Category::Keodo,
        summary: "Ai thắng giữ cơ đánh tiếp; thua phải nhường cơ. Tiền thắng tăng theo chuỗi thắng liên tiếp (ví dụ +10k theo cấp số).",
        notes: &[
            "Mỗi ván lưu người thắng; hệ thống tự tính chuỗi thắng (streak).",
            "Tiền một ván = baseStake nếu streak=1; nếu chọn 'cấp số cộng' → baseStake + (streak-1)*step; nếu 'cấp số nhân' → baseStake * (multiplier)^(streak-1).",
            "Chuỗi thắng reset khi người đó thua.",
        ],
        max_players: MAX_PLAYERS,
        mode: Mode::Streak { base: 10_000, step: 10_000 },
    },
    CatalogEntry {
        slug: "keodo-time",
        name: "Độ theo thời gian (công tơ/giờ chơi)",
        category: Category::Keodo,
        summary: "Dành cho nhóm chơi lâu: chia đều chi phí giờ bàn, cuối buổi cộng/trừ độ theo kết quả tổng.",
        notes: &[
            "Nhập tổng thời gian, đơn giá/giờ; hệ thống chia đều 'phí bàn' cho mỗi người.",
            "Trong buổi có thể vẫn ghi per-rack người thắng để tính độ; cuối buổi = (độ thắng/thua) ± phần phí bàn.",
        ],
        max_players: MAX_PLAYERS,
        mode: Mode::Timed { hourly_rate: 120_000, minutes: 90 },
    },
];

/// Every catalog entry, in menu order.
pub fn entries() -> &'static [CatalogEntry] {
    &ENTRIES
}

/// Look an entry up by its slug.
pub fn find(slug: &str) -> Option<&'static CatalogEntry> {
    ENTRIES.iter().find(|e| e.slug == slug)
}

/// Entries grouped by category, in display order (Pool, Carom, Kèo Độ).
pub fn grouped() -> Vec<(Category, Vec<&'static CatalogEntry>)> {
    [Category::Pool, Category::Carom, Category::Keodo]
        .into_iter()
        .map(|category| {
            let group = ENTRIES.iter().filter(|e| e.category == category).collect();
            (category, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::RoundKind;

    #[test]
    fn test_slugs_are_unique() {
        for (i, entry) in ENTRIES.iter().enumerate() {
            assert!(
                ENTRIES[..i].iter().all(|e| e.slug != entry.slug),
                "duplicate slug {}",
                entry.slug,
            );
        }
    }

    #[test]
    fn test_find_by_slug() {
        let entry = find("ta-la").unwrap();
        assert_eq!(entry.category, Category::Keodo);
        assert_eq!(entry.max_players, 4);
        assert!(find("snooker-147").is_none());
    }

    #[test]
    fn test_grouped_matches_menu_order() {
        let groups = grouped();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, Category::Pool);
        assert_eq!(groups[1].0, Category::Carom);
        assert_eq!(groups[2].0, Category::Keodo);

        assert_eq!(groups[0].1.len(), 10);
        assert_eq!(groups[1].1.len(), 1);
        assert_eq!(groups[2].1.len(), 5);

        // Tá lả leads the kèo độ group
        assert_eq!(groups[2].1[0].slug, "ta-la");
    }

    #[test]
    fn test_starter_configs_validate() {
        for entry in entries() {
            let config = entry.starter_config(2);
            assert!(
                config.validate(2).is_ok(),
                "starter config for {} does not validate",
                entry.slug,
            );
        }
    }

    #[test]
    fn test_starter_modes() {
        assert_eq!(find("pool-9-ball").unwrap().starter_config(3), GameConfig::Tally);
        assert_eq!(
            find("ta-la").unwrap().starter_config(3).round_kind(),
            RoundKind::Matrix,
        );
        assert_eq!(
            find("bia-99-bi-danh-den").unwrap().starter_config(3),
            GameConfig::fixed_99(1_000),
        );
        assert_eq!(
            find("99-bi-den").unwrap().starter_config(3),
            GameConfig::countdown_even(99, 3),
        );
        assert_eq!(
            find("keodo-time").unwrap().starter_config(4).round_kind(),
            RoundKind::Timed,
        );
    }

    #[test]
    fn test_start_session_honors_player_limit() {
        let ta_la = find("ta-la").unwrap();
        let session = ta_la.start_session(&["A", "B", "C"]).unwrap();
        assert_eq!(session.config().round_kind(), RoundKind::Matrix);
        assert_eq!(session.roster().limit(), 4);

        assert!(ta_la.start_session(&["A", "B", "C", "D", "E"]).is_err());

        let nine_ball = find("pool-9-ball").unwrap();
        assert!(nine_ball.start_session(&["A", "B", "C", "D", "E"]).is_ok());
    }
}
