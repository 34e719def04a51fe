use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use safmr_finder::data::filter::SortDirection;
use safmr_finder::data::schema::{BedroomTier, RentTier};
use safmr_finder::state::{AppState, NoticeLevel, QueryMode, UserAction};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu, the mode switch and the status notice.
pub fn top_bar(ui: &mut Ui, state: &AppState, actions: &mut Vec<UserAction>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                if let Some(path) = open_file_dialog() {
                    actions.push(UserAction::OpenDataset(path));
                }
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                actions.push(UserAction::Reload);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui
            .selectable_label(state.mode == QueryMode::PointLookup, "ZIP lookup")
            .clicked()
        {
            actions.push(UserAction::SelectPointLookup);
        }
        if ui
            .selectable_label(state.mode == QueryMode::Rank, "Rank by region")
            .clicked()
        {
            actions.push(UserAction::SelectRank);
        }

        ui.separator();
        ui.label(format!("{} ZIP codes", state.dataset.table.len()));
    });

    if let Some(notice) = &state.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color32::GRAY,
            NoticeLevel::Warning => Color32::from_rgb(0xd0, 0x90, 0x20),
            NoticeLevel::Error => Color32::RED,
        };
        ui.label(RichText::new(&notice.text).color(color));
    }
}

// ---------------------------------------------------------------------------
// Left side panel – query inputs
// ---------------------------------------------------------------------------

/// Render the input form for the current mode.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, actions: &mut Vec<UserAction>) {
    match state.mode {
        QueryMode::PointLookup => point_form(ui, state, actions),
        QueryMode::Rank => rank_form(ui, state, actions),
    }
}

fn point_form(ui: &mut Ui, state: &mut AppState, actions: &mut Vec<UserAction>) {
    ui.heading("Fair Market Rent by ZIP");
    ui.separator();

    ui.label("ZIP code (5 digits):");
    let response = ui.text_edit_singleline(&mut state.point.zip_input);
    let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    ui.add_space(4.0);
    bedroom_selector(ui, "point_bedroom", &mut state.point.bedroom);

    ui.add_space(8.0);
    if ui.button("Find Rent").clicked() || entered {
        actions.push(UserAction::Submit);
    }
}

fn rank_form(ui: &mut Ui, state: &mut AppState, actions: &mut Vec<UserAction>) {
    ui.heading("Rank ZIP codes");
    ui.separator();

    ui.label("Region:");
    let form = &mut state.rank;
    egui::ComboBox::from_id_salt("rank_region")
        .selected_text(form.region.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for region in &state.regions {
                ui.selectable_value(&mut form.region, region.clone(), region.as_str());
            }
        });

    ui.add_space(4.0);
    bedroom_selector(ui, "rank_bedroom", &mut form.bedroom);

    ui.add_space(4.0);
    ui.label("Rent figure:");
    egui::ComboBox::from_id_salt("rank_tier")
        .selected_text(form.tier.label())
        .show_ui(ui, |ui: &mut Ui| {
            for tier in RentTier::ALL {
                ui.selectable_value(&mut form.tier, tier, tier.label());
            }
        });

    ui.add_space(4.0);
    ui.label("Rent range (optional):");
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::TextEdit::singleline(&mut form.min_input)
                .hint_text("min")
                .desired_width(80.0),
        );
        ui.label("to");
        ui.add(
            egui::TextEdit::singleline(&mut form.max_input)
                .hint_text("max")
                .desired_width(80.0),
        );
    });

    ui.add_space(4.0);
    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        ui.radio_value(&mut form.direction, direction, direction.label());
    }

    ui.add_space(8.0);
    if ui.button("Rank ZIP codes").clicked() {
        actions.push(UserAction::Submit);
    }
}

fn bedroom_selector(ui: &mut Ui, id: &str, bedroom: &mut BedroomTier) {
    ui.label("Number of bedrooms:");
    egui::ComboBox::from_id_salt(id)
        .selected_text(bedroom.label())
        .show_ui(ui, |ui: &mut Ui| {
            for tier in BedroomTier::ALL {
                ui.selectable_value(&mut *bedroom, tier, tier.label());
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open SAFMR dataset")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "csv", "parquet", "pq", "json"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file()
}
