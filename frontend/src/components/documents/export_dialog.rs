//! Export dialog: copies per selected document, progress and failures.

use yew::prelude::*;

use common::copies::{clamp_copies, MAX_COPIES};
use common::model::CategoryView;

use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::messages::Msg;
use super::state::DocumentsComponent;

pub fn build_export_dialog(component: &DocumentsComponent, ctx: &Context<DocumentsComponent>) -> Html {
    let Some(export) = &component.export else {
        return html! {};
    };
    let link = ctx.link();
    let selection = component.selection();
    let total: u32 = selection
        .iter()
        .map(|doc| {
            component
                .copies
                .resolve(&component.view, &doc.title, export.overrides.get(&doc.id).copied())
        })
        .sum();

    html! {
        <YwMaterialTopSheet node_ref={NodeRef::default()} open={true}>
            <div class="dialog export-dialog">
                <h3>{ format!("Export {} document(s)", selection.len()) }</h3>
                <p class="hint">
                    {
                        if component.view == CategoryView::All {
                            "One copy each unless changed below.".to_string()
                        } else {
                            format!("Copy counts follow the {} packet policy and can be changed below.", component.view.label())
                        }
                    }
                </p>
                <table class="data-table">
                    <thead>
                        <tr><th>{ "Document" }</th><th>{ "Copies" }</th></tr>
                    </thead>
                    <tbody>
                        { for selection.iter().map(|doc| {
                            let override_count = export.overrides.get(&doc.id).copied();
                            let copies = component.copies.resolve(&component.view, &doc.title, override_count);
                            let id = doc.id.clone();
                            html! {
                                <tr key={doc.id.clone()}>
                                    <td>{ &doc.title }</td>
                                    <td>
                                        <input
                                            type="number"
                                            min="1"
                                            max={MAX_COPIES.to_string()}
                                            value={copies.to_string()}
                                            disabled={export.running}
                                            onchange={link.callback(move |e: Event| {
                                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                                let count = input.value().trim().parse::<u32>().ok().map(clamp_copies);
                                                Msg::SetOverride(id.clone(), count)
                                            })}
                                        />
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
                <div class="export-total">{ format!("{} copies in total", total) }</div>
                {
                    if let Some(progress) = &export.progress {
                        let percent = progress.percent();
                        html! {
                            <div class="progress">
                                <div class="progress-bar" style={format!("width: {}%", percent)}></div>
                                <span>{ format!("{} / {} ({}%)", progress.processed, progress.total, percent) }</span>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
                {
                    if export.failures.is_empty() {
                        html! {}
                    } else {
                        html! {
                            <ul class="export-failures">
                                { for export.failures.iter().map(|failure| html! {
                                    <li>{ format!("{}: {}", failure.title, failure.error) }</li>
                                }) }
                            </ul>
                        }
                    }
                }
                <div class="dialog-actions">
                    <button class="btn" disabled={export.running} onclick={link.callback(|_| Msg::CloseExport)}>
                        { "Close" }
                    </button>
                    <button class="btn btn-primary" disabled={export.running} onclick={link.callback(|_| Msg::StartExport)}>
                        { if export.running { "Exporting…" } else { "Export PDF" } }
                    </button>
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}
