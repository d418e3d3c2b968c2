//! Confirmation gate for destructive actions.
//!
//! Screens keep a `pending` action of their own message type and render this
//! dialog while it is set; nothing is sent until the user confirms.

use yew::prelude::*;

use super::yw_material_top_sheet::YwMaterialTopSheet;

#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
    pub title: AttrValue,
    pub message: AttrValue,
    #[prop_or(AttrValue::from("Delete"))]
    pub confirm_label: AttrValue,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    let node_ref = use_node_ref();
    let on_confirm = {
        let cb = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_cancel = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <YwMaterialTopSheet node_ref={node_ref} open={true}>
            <div class="dialog confirm-dialog" role="alertdialog">
                <h3>{ props.title.clone() }</h3>
                <p>{ props.message.clone() }</p>
                <div class="dialog-actions">
                    <button class="btn" onclick={on_cancel}>{ "Cancel" }</button>
                    <button class="btn btn-danger" onclick={on_confirm}>
                        { props.confirm_label.clone() }
                    </button>
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}
