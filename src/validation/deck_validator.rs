// src/validation/deck_validator.rs

use crate::domain::{Deck, DeckRules, Tournament};
use crate::infra::catalog::{CardCatalog, CardType};
use crate::validation::result::ValidationResult;

/// Проверить колоду против правил турнира.
///
/// Проверки идут по порядку и НАКАПЛИВАЮТСЯ — никакого short-circuit:
/// 1) размер колоды (точный или диапазон);
/// 2) запрещённые сеты по уникальным сетам колоды;
/// 3) по каждой записи: сет карты, точечный бан, лимит копий
///    (базовая энергия освобождена), предупреждение о точечном
///    ограничении даже при соблюдении лимита;
/// 4) минимум базовых покемонов — только предупреждение: полная
///    проверка требует типов карт из внешнего каталога.
///
/// Побочный эффект: выставляет `deck.is_valid` (= нет ошибок).
/// Персистит колоду после этого вызывающий.
pub fn validate_deck(deck: &mut Deck, tournament: &Tournament) -> ValidationResult {
    let rules = &tournament.deck_rules;
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // 1. Размер.
    let total = deck.total_card_count();
    if rules.exact_deck_size {
        if total != rules.min_deck_size {
            errors.push(format!(
                "В колоде {} карт, турнир требует ровно {}",
                total, rules.min_deck_size
            ));
        }
    } else if total < rules.min_deck_size || total > rules.max_deck_size {
        errors.push(format!(
            "В колоде {} карт, допустимо от {} до {}",
            total, rules.min_deck_size, rules.max_deck_size
        ));
    }

    // 2. Запрещённые сеты (по уникальным сетам колоды).
    for set_name in deck.unique_sets() {
        if !tournament.is_set_allowed(&set_name) {
            errors.push(format!("Сет \"{}\" запрещён в этом турнире", set_name));
        }
    }

    // 3. По-карточные проверки.
    for card in &deck.cards {
        // 3a. Сет карты — дублирующая проверка на случай, когда
        // гранулярность сета карты отличается от агрегатной.
        if !tournament.is_set_allowed(&card.set_name) {
            errors.push(format!(
                "Карта {}/{} из запрещённого сета",
                card.set_name, card.card_id
            ));
        } else if tournament.is_card_banned(&card.set_name, &card.card_id) {
            // 3b. Точечный бан внутри разрешённого сета.
            errors.push(format!(
                "Карта {}/{} запрещена в этом турнире",
                card.set_name, card.card_id
            ));
        }

        // 3c. Лимит копий. Базовая энергия (маркер "без уровня"
        // в идентификаторе) под лимит не подпадает.
        if !card.is_basic_energy() {
            let max_copies = tournament.max_copies_for_card(&card.set_name, &card.card_id);
            if card.quantity > max_copies {
                errors.push(format!(
                    "Карта {}/{}: {} копий при лимите {}",
                    card.set_name, card.card_id, card.quantity, max_copies
                ));
            }
        }

        // 3d. Точечное ограничение упоминаем даже при соблюдении лимита.
        if tournament.is_card_restricted(&card.set_name, &card.card_id) {
            warnings.push(format!(
                "Карта {}/{} под точечным ограничением (максимум {} копий)",
                card.set_name,
                card.card_id,
                tournament.max_copies_for_card(&card.set_name, &card.card_id)
            ));
        }
    }

    // 4. Минимум базовых покемонов: на этом уровне только предупреждение.
    if rules.min_basic_pokemon > 0 {
        warnings.push(format!(
            "Турнир требует минимум {} базовых покемонов; без каталога карт \
             эта проверка здесь не выполняется",
            rules.min_basic_pokemon
        ));
    }

    let result = ValidationResult::from_parts(errors, warnings);
    deck.is_valid = result.is_valid;
    result
}

/// Полная проверка минимума базовых покемонов — с каталогом карт.
///
/// Это уже обязанность внешнего коллаборатора (нужен доступ к
/// мастер-данным карт), поэтому функция отдельная и в `validate_deck`
/// не вызывается. Возвращает текст ошибки, если минимум не набран.
pub fn verify_min_basic_pokemon(
    deck: &Deck,
    rules: &DeckRules,
    catalog: &dyn CardCatalog,
) -> Option<String> {
    if rules.min_basic_pokemon == 0 {
        return None;
    }

    let mut basic_count: u32 = 0;
    for card in &deck.cards {
        if let Some(info) = catalog.lookup(&card.set_name, &card.card_id) {
            if matches!(info.card_type, CardType::Pokemon { is_basic: true }) {
                basic_count += card.quantity;
            }
        }
    }

    if basic_count < rules.min_basic_pokemon {
        Some(format!(
            "В колоде {} базовых покемонов, турнир требует минимум {}",
            basic_count, rules.min_basic_pokemon
        ))
    } else {
        None
    }
}
