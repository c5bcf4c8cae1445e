// src/engine/available/conditions.rs

//! Сквозные условия, общие для нескольких фазовых провайдеров.
//!
//! Логика "висит ли за атакой невыбранный приз" и "кому нужен выбор
//! активного покемона" живёт ТОЛЬКО здесь: если каждый провайдер будет
//! выводить её заново, ответы рано или поздно разойдутся.

use crate::engine::actions::{ActionRecord, PlayerActionType};
use crate::engine::game_state::GameStateContext;
use crate::domain::PlayerIdentifier;

/// Висит ли за текущим игроком невыбранный приз после нокаута.
///
/// Приз считается невыбранным, если последнее действие — ATTACK этого
/// игрока с isKnockedOut = true, и ПОЗЖЕ этой атаки в истории нет
/// SELECT_PRIZE / DRAW_PRIZE того же игрока.
///
/// Поиск позиции атаки в истории: сначала по action_id; если id нет —
/// считаем атаку последней записью истории, если её тип и игрок
/// совпадают с last_action. Если не нашли вообще — консервативно
/// считаем приз невыбранным: потребовать лишний выбор безопаснее,
/// чем позволить пропустить обязательный шаг.
pub fn prize_selection_pending(ctx: &GameStateContext, player: PlayerIdentifier) -> bool {
    let last = match &ctx.last_action {
        Some(a) => a,
        None => return false,
    };

    if last.action_type != PlayerActionType::Attack
        || last.player != player
        || !last.is_knocked_out()
    {
        return false;
    }

    let attack_pos = locate_attack(ctx, last);

    match attack_pos {
        Some(pos) => !ctx.action_history[pos + 1..]
            .iter()
            .any(|a| a.player == player && is_prize_take(a.action_type)),
        None => true,
    }
}

fn locate_attack(ctx: &GameStateContext, attack: &ActionRecord) -> Option<usize> {
    if let Some(id) = attack.action_id {
        if let Some(pos) = ctx
            .action_history
            .iter()
            .position(|a| a.action_id == Some(id))
        {
            return Some(pos);
        }
    }

    // Fallback: атака — последняя запись истории.
    match ctx.action_history.last() {
        Some(tail)
            if tail.action_type == PlayerActionType::Attack && tail.player == attack.player =>
        {
            Some(ctx.action_history.len() - 1)
        }
        _ => None,
    }
}

fn is_prize_take(action: PlayerActionType) -> bool {
    matches!(
        action,
        PlayerActionType::SelectPrize | PlayerActionType::DrawPrize
    )
}

/// Нужен ли игроку выбор активного покемона.
pub fn needs_active_selection(ctx: &GameStateContext, player: PlayerIdentifier) -> bool {
    ctx.player(player).needs_active_selection()
}

/// Двойной нокаут: выбор активного нужен ОБОИМ игрокам.
/// Пока это так, END_TURN недоступен никому.
pub fn both_need_active_selection(ctx: &GameStateContext) -> bool {
    ctx.player1.needs_active_selection() && ctx.player2.needs_active_selection()
}
