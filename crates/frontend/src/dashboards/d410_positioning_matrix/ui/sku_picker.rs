use contracts::dashboards::d410_positioning_matrix::SkuListItem;
use leptos::prelude::*;
use thaw::*;

/// Items whose SKU or description contains `query`, ignoring case
pub fn filter_items<'a>(items: &'a [SkuListItem], query: &str) -> Vec<&'a SkuListItem> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            query.is_empty()
                || item.sku.to_lowercase().contains(&query)
                || item.descripcion.to_lowercase().contains(&query)
        })
        .collect()
}

fn toggle(selected: &mut Vec<String>, sku: &str) {
    if let Some(pos) = selected.iter().position(|s| s == sku) {
        selected.remove(pos);
    } else {
        selected.push(sku.to_string());
    }
}

/// Searchable checkbox list of the month's SKUs
#[component]
pub fn SkuPicker(
    #[prop(into)] items: Signal<Vec<SkuListItem>>,
    selected: RwSignal<Vec<String>>,
) -> impl IntoView {
    let query = RwSignal::new(String::new());
    let visible = Memo::new(move |_| {
        items.with(|all| {
            filter_items(all, &query.get())
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let select_visible = move |_| {
        let skus: Vec<String> = visible.with(|v| v.iter().map(|i| i.sku.clone()).collect());
        selected.update(|s| {
            for sku in skus {
                if !s.contains(&sku) {
                    s.push(sku);
                }
            }
        });
    };

    view! {
        <div class="sku-picker">
            <div class="sku-picker__toolbar">
                <input
                    type="search"
                    class="sku-picker__search"
                    placeholder="Buscar SKU o descripción"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev))
                />
                <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle on_click=select_visible>
                    "Seleccionar visibles"
                </Button>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| selected.set(Vec::new())
                >
                    "Limpiar"
                </Button>
                <span class="sku-picker__count">
                    {move || format!("{} seleccionados", selected.with(|s| s.len()))}
                </span>
            </div>
            <ul class="sku-picker__list">
                <For each=move || visible.get() key=|item| item.sku.clone() let:item>
                    {
                        let sku = item.sku.clone();
                        let checked_sku = sku.clone();
                        view! {
                            <li>
                                <label>
                                    <input
                                        type="checkbox"
                                        prop:checked=move || selected.with(|s| s.contains(&checked_sku))
                                        on:change=move |_| selected.update(|s| toggle(s, &sku))
                                    />
                                    <span class="sku-picker__sku">{item.sku}</span>
                                    <span class="sku-picker__desc">{item.descripcion}</span>
                                    <span class="sku-picker__class">{item.clasificacion}</span>
                                </label>
                            </li>
                        }
                    }
                </For>
            </ul>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, descripcion: &str) -> SkuListItem {
        SkuListItem {
            sku: sku.into(),
            descripcion: descripcion.into(),
            clasificacion: "Estrellas".into(),
        }
    }

    #[test]
    fn search_matches_sku_or_description() {
        let items = vec![item("A1", "Bocina portátil"), item("B2", "Audífonos")];
        assert_eq!(filter_items(&items, "").len(), 2);
        assert_eq!(filter_items(&items, "bocina")[0].sku, "A1");
        assert_eq!(filter_items(&items, " b2 ")[0].sku, "B2");
        assert!(filter_items(&items, "cable").is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selected = vec!["A1".to_string()];
        toggle(&mut selected, "B2");
        assert_eq!(selected, vec!["A1", "B2"]);
        toggle(&mut selected, "A1");
        assert_eq!(selected, vec!["B2"]);
    }
}
