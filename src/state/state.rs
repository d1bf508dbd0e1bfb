use crate::state::data::*;
use tokio::sync::Mutex;

pub struct State {
    pub server: Mutex<Data>,
}

impl State {
    pub fn new(srv: Data) -> Self {
        Self {
            server: Mutex::new(srv),
        }
    }
}
