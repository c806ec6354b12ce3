use web_sys::{console, Storage};

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn load(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

pub fn save(key: &str, value: &str) {
    let stored = local_storage().map(|storage| storage.set_item(key, value).is_ok());
    if stored != Some(true) {
        console::warn_1(&format!("could not persist {}", key).into());
    }
}

pub fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}
