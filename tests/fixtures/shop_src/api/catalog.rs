pub struct Category {
    name: String,
    parent: Option<Box<Category>>,
}

impl Category {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    pub fn get_children(&self) -> Vec<Category> {
        Vec::new()
    }
}

pub trait CategoryRepositoryInterface {
    fn save(&self, category: Category) -> Category;
}

pub mod cart {
    pub struct CartItem {
        sku: String,
        qty: f64,
    }

    impl CartItem {
        pub fn get_sku(&self) -> String {
            self.sku.clone()
        }

        pub fn get_qty(&self) -> f64 {
            self.qty
        }

        pub fn get_product_option(&self) -> ProductOption {
            ProductOption
        }
    }

    pub struct ProductOption;
}

pub trait CartItemRepositoryInterface {
    fn save(&self, cart_item: cart::CartItem) -> cart::CartItem;
}
