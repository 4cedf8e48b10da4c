use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Защита от повторного клика: пока запрос по ключу в полете, второй отклоняется.
#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<InFlightGuard> {
        let key = key.into();
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        if !keys.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard { keys: self.keys.clone(), key })
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.keys.lock().unwrap_or_else(|e| e.into_inner()).contains(key)
    }
}

/// Снимает блокировку при drop, в том числе при ошибке обработчика.
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys.lock().unwrap_or_else(|e| e.into_inner()).remove(&self.key);
    }
}
