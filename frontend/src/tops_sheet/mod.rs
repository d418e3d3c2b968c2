pub mod confirm_dialog;
pub mod yw_material_top_sheet;
