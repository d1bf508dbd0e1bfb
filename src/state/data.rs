/*
 * Isabelle project
 *
 * Copyright 2023-2025 Maxim Menshikov
 *
 * Permission is hereby granted, free of charge, to any person obtaining
 * a copy of this software and associated documentation files (the “Software”),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included
 * in all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS
 * OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
use crate::data_model::Record;
use crate::state::store::{Store, StoreError};
use log::debug;

/// Typed access to the store.
pub struct Data {
    pub rw: Box<dyn Store>,
}

impl Data {
    pub fn new(rw: Box<dyn Store>) -> Self {
        Self { rw }
    }

    pub async fn get<T: Record>(&mut self, id: u64) -> Result<Option<T>, StoreError> {
        match self.rw.get_item(T::COLLECTION, id).await? {
            Some(itm) => Ok(Some(serde_json::from_value(itm)?)),
            None => Ok(None),
        }
    }

    /// All records of a kind, in id order.
    pub async fn all<T: Record>(&mut self) -> Result<Vec<T>, StoreError> {
        let items = self.rw.get_all_items(T::COLLECTION).await?;
        let mut lst = Vec::with_capacity(items.len());
        for (_, itm) in items {
            lst.push(serde_json::from_value(itm)?);
        }
        Ok(lst)
    }

    /// Stores `rec` under a freshly allocated id and writes the id back.
    pub async fn insert<T: Record>(&mut self, rec: &mut T) -> Result<u64, StoreError> {
        let id = self.rw.next_id(T::COLLECTION).await?;
        rec.set_id(id);
        let itm = serde_json::to_value(&*rec)?;
        self.rw.set_item(T::COLLECTION, id, &itm).await?;
        debug!("Inserted {} {}", T::COLLECTION, rec.id());
        Ok(rec.id())
    }

    pub async fn remove<T: Record>(&mut self, id: u64) -> Result<bool, StoreError> {
        self.rw.del_item(T::COLLECTION, id).await
    }
}
