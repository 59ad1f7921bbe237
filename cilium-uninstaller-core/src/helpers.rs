use std::any::type_name;

pub fn pretty_type_name<'a, T>() -> &'a str {
    type_name::<T>().split("::").last().unwrap_or_default()
}

pub trait AndIf<F> {
    fn and_if(self, condition: bool, then: F) -> Self;
}

pub trait AndIfSome<F, FC> {
    fn and_if_some(self, closure: FC, then: F) -> Self;
}

impl<T, F> AndIf<F> for T
where
    F: FnOnce(Self) -> Self,
{
    fn and_if(self, condition: bool, then: F) -> Self {
        let mut obj = self;
        if condition {
            obj = then(obj);
        }

        obj
    }
}

impl<T, TC, F, FC> AndIfSome<F, FC> for T
where
    F: FnOnce(Self, TC) -> Self,
    FC: FnOnce() -> Option<TC>,
{
    fn and_if_some(self, closure: FC, then: F) -> Self {
        let mut obj = self;
        if let Some(result) = closure() {
            obj = then(obj, result);
        }

        obj
    }
}
