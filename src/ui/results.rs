use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use safmr_finder::data::filter::{RankQuery, RankResult};
use safmr_finder::data::lookup::{RentFigures, RentResult};
use safmr_finder::format::{format_currency, format_dollars};
use safmr_finder::state::{AppState, QueryMode, UserAction};

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Result tables (central panel)
// ---------------------------------------------------------------------------

/// Render the result of the last query for the current mode.
pub fn results_view(ui: &mut Ui, state: &AppState, actions: &mut Vec<UserAction>) {
    match state.mode {
        QueryMode::PointLookup => match &state.point.result {
            None => placeholder(ui, "Enter a ZIP code and press Find Rent."),
            Some(RentResult::NotFound) => {
                ui.label(RichText::new("❌ ZIP code not found.").color(Color32::RED));
            }
            Some(RentResult::DataUnavailable) => {
                ui.label(RichText::new("❌ Rent information not available.").color(Color32::RED));
            }
            Some(RentResult::Found(figures)) => figures_table(ui, figures),
        },
        QueryMode::Rank => match &state.rank.result {
            None => placeholder(ui, "Pick a region and press Rank ZIP codes."),
            Some(result) => match &state.rank.last_query {
                Some(query) => ranking_table(ui, query, result, actions),
                None => placeholder(ui, "Pick a region and press Rank ZIP codes."),
            },
        },
    }
}

fn placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

fn figures_table(ui: &mut Ui, figures: &RentFigures) {
    ui.label(RichText::new("✅ Estimated FMR Found:").color(Color32::DARK_GREEN));
    ui.add_space(4.0);

    let headers = ["Bedroom Size", "Standard FMR", "90% Payment", "110% Payment"];
    let cells = [
        figures.bedroom.label().to_string(),
        format_dollars(figures.standard),
        format_dollars(figures.payment_90),
        format_dollars(figures.payment_110),
    ];

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(110.0), headers.len())
        .header(ROW_HEIGHT, |mut header| {
            for title in headers {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            body.row(ROW_HEIGHT, |mut row| {
                for cell in &cells {
                    row.col(|ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });
}

fn ranking_table(
    ui: &mut Ui,
    query: &RankQuery,
    result: &RankResult,
    actions: &mut Vec<UserAction>,
) {
    if result.is_empty() {
        ui.label(format!(
            "No ZIP codes in {} match these filters.",
            query.region_code
        ));
        return;
    }

    ui.label(format!(
        "Showing {} of {} ZIP codes in {} · {} · {}",
        result.entries.len(),
        result.total_matches,
        query.region_code,
        query.bedroom,
        query.tier
    ));
    ui.add_space(4.0);

    let available = ui.available_height() - 2.0 * ROW_HEIGHT;
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(available.max(ROW_HEIGHT))
        .column(Column::exact(40.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("ZIP Code");
            });
            header.col(|ui| {
                ui.strong(query.tier.label());
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, result.entries.len(), |mut row| {
                let idx = row.index();
                let entry = &result.entries[idx];
                row.col(|ui| {
                    ui.label((idx + 1).to_string());
                });
                row.col(|ui| {
                    ui.label(entry.postal_code.as_str());
                });
                row.col(|ui| {
                    ui.label(format_currency(entry.rent));
                });
            });
        });

    if result.has_more {
        ui.add_space(4.0);
        if ui.button("Show more").clicked() {
            actions.push(UserAction::ShowMore);
        }
    }
}
