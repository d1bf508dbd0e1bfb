pub mod data;
pub mod state;
pub mod store;
pub mod store_local;
pub mod store_mongo;

#[cfg(test)]
pub mod testing {
    use crate::state::data::Data;
    use crate::state::store::Store;
    use crate::state::store_local::StoreLocal;
    use std::path::PathBuf;

    /// Removes the directory on drop.
    pub struct TempDir(pub PathBuf);

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    pub async fn temp_data() -> (Data, TempDir) {
        let path = std::env::temp_dir().join(format!("mentorship-{}", uuid::Uuid::new_v4()));
        let mut st = StoreLocal::new();
        st.connect(path.to_str().unwrap()).await.unwrap();
        (Data::new(Box::new(st)), TempDir(path))
    }
}
