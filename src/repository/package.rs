use diesel::prelude::*;

use crate::{
    domain::hotel::Package,
    models::hotel::Package as DbPackage,
    repository::{DieselRepository, PackageReader, RepositoryResult},
};

impl PackageReader for DieselRepository {
    fn list_packages(&self, hotel_id: i32) -> RepositoryResult<Vec<Package>> {
        use crate::schema::packages;

        let mut conn = self.conn()?;
        let items = packages::table
            .filter(packages::hotel_id.eq(hotel_id))
            .order(packages::id.asc())
            .load::<DbPackage>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }
}
